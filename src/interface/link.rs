//! State shared by the receive and transmit loops.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Minimum quiet time on the bus before this panel transmits.
pub const MIN_FRAME_GAP: Duration = Duration::from_millis(50);

/// Counter snapshot returned by [`crate::ValloxBus::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Valid frames taken off the wire and queued as events
    pub frames_received: u64,
    /// Bytes dropped while resynchronising on frame boundaries
    pub bytes_discarded: u64,
    /// Frames written to the serial port
    pub frames_sent: u64,
    /// Outgoing frames dropped by the write policy
    pub writes_denied: u64,
    /// Serial writes that returned an error
    pub write_errors: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    frames_received: AtomicU64,
    bytes_discarded: AtomicU64,
    frames_sent: AtomicU64,
    writes_denied: AtomicU64,
    write_errors: AtomicU64,
}

impl Counters {
    pub(crate) fn inc_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_discarded(&self, bytes: u64) {
        self.bytes_discarded.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn inc_sent(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_denied(&self) {
        self.writes_denied.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            bytes_discarded: self.bytes_discarded.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            writes_denied: self.writes_denied.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Running flag and last bus activity, both atomics so neither loop needs a
/// lock to read what the other one wrote.
///
/// Activity is kept as nanoseconds since `epoch`, the moment the session was
/// opened. It only moves forward: a late writer with an older reading cannot
/// pull it back.
#[derive(Debug)]
pub(crate) struct Link {
    epoch: Instant,
    running: AtomicBool,
    last_activity: AtomicU64,
    pub(crate) counters: Counters,
}

impl Link {
    pub(crate) fn new() -> Self {
        Self {
            epoch: Instant::now(),
            running: AtomicBool::new(true),
            last_activity: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Returns true for the call that actually stopped the session.
    pub(crate) fn stop(&self) -> bool {
        self.running.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn mark_activity(&self) {
        self.last_activity.fetch_max(self.now(), Ordering::AcqRel);
    }

    pub(crate) fn idle(&self) -> Duration {
        let last = self.last_activity.load(Ordering::Acquire);
        Duration::from_nanos(self.now().saturating_sub(last))
    }

    /// Sleeps out whatever is left of [`MIN_FRAME_GAP`] since the last
    /// activity and returns how long that was.
    pub(crate) fn wait_for_gap(&self) -> Option<Duration> {
        let idle = self.idle();
        if idle >= MIN_FRAME_GAP {
            return None;
        }
        let wait = MIN_FRAME_GAP - idle;
        thread::sleep(wait);
        Some(wait)
    }

    fn now(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}
