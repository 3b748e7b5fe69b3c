//! Simulated serial line for bus tests, built on `crossbeam` channels.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use embedded_hal::{blocking, serial};

/// Routes the crate's `tracing` output to the test harness.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("vallox_rs485=trace")
        .with_test_writer()
        .try_init()
        .ok();
}

#[derive(Debug)]
pub struct Closed;

pub struct MockRx {
    bytes: Receiver<u8>,
}

impl serial::Read<u8> for MockRx {
    type Error = Closed;

    fn read(&mut self) -> nb::Result<u8, Closed> {
        match self.bytes.recv_timeout(Duration::from_millis(2)) {
            Ok(byte) => Ok(byte),
            Err(RecvTimeoutError::Timeout) => Err(nb::Error::WouldBlock),
            Err(RecvTimeoutError::Disconnected) => Err(nb::Error::Other(Closed)),
        }
    }
}

/// A port that never has a byte ready. Counts how often it is polled.
pub struct IdleRx {
    reads: Arc<AtomicUsize>,
}

impl serial::Read<u8> for IdleRx {
    type Error = Closed;

    fn read(&mut self) -> nb::Result<u8, Closed> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Err(nb::Error::WouldBlock)
    }
}

#[derive(Debug, Clone)]
pub struct Written {
    pub at: Instant,
    pub bytes: Vec<u8>,
}

pub struct MockTx {
    written: Sender<Written>,
    fail: bool,
}

impl blocking::serial::Write<u8> for MockTx {
    type Error = Closed;

    fn bwrite_all(&mut self, buffer: &[u8]) -> Result<(), Closed> {
        if self.fail {
            return Err(Closed);
        }
        let at = Instant::now();
        self.written
            .send(Written {
                at,
                bytes: buffer.to_vec(),
            })
            .map_err(|_| Closed)
    }

    fn bflush(&mut self) -> Result<(), Closed> {
        Ok(())
    }
}

/// The far side of the simulated line.
pub struct Wire {
    to_bus: Option<Sender<u8>>,
    from_bus: Receiver<Written>,
}

impl Wire {
    pub fn inject(&self, bytes: &[u8]) {
        if let Some(to_bus) = &self.to_bus {
            for byte in bytes {
                to_bus.send(*byte).unwrap();
            }
        }
    }

    /// Simulates the port going away: the next read fails.
    pub fn close(&mut self) {
        self.to_bus = None;
    }

    pub fn next_write(&self, timeout: Duration) -> Option<Written> {
        self.from_bus.recv_timeout(timeout).ok()
    }
}

pub fn serial_pair() -> ((MockRx, MockTx), Wire) {
    line(false)
}

/// Like [`serial_pair`], but every write fails.
pub fn broken_tx_pair() -> ((MockRx, MockTx), Wire) {
    line(true)
}

/// A silent line, with a shared count of receive polls.
pub fn idle_pair() -> ((IdleRx, MockTx), Arc<AtomicUsize>, Wire) {
    let ((_, tx), wire) = line(false);
    let reads = Arc::new(AtomicUsize::new(0));
    let rx = IdleRx {
        reads: Arc::clone(&reads),
    };
    ((rx, tx), reads, wire)
}

fn line(fail: bool) -> ((MockRx, MockTx), Wire) {
    let (to_bus, bytes) = unbounded();
    let (written, from_bus) = unbounded();
    (
        (MockRx { bytes }, MockTx { written, fail }),
        Wire {
            to_bus: Some(to_bus),
            from_bus,
        },
    )
}

pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}
