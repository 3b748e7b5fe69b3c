use std::fmt::Debug;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use crossbeam_channel::Sender;
use embedded_hal::serial;
use tracing::{debug, trace, warn};

use super::link::Link;
use crate::event::Event;
use crate::protocol::Resync;

/// Most bytes taken from the port before looking for frames.
const READ_CHUNK: usize = 32;

/// Back-off while the port has nothing for us, about one byte time at 9600
/// baud.
const IDLE_POLL: Duration = Duration::from_millis(1);

/// Receive loop. Ends on the first read error, when nobody is left to take
/// events, or once the session is stopped from outside.
///
/// A full event queue blocks this loop, and with it the serial read, until
/// the consumer catches up. Nothing is dropped.
pub(crate) fn run<R>(mut rx: R, link: Arc<Link>, events: Sender<Event>)
where
    R: serial::Read<u8>,
    R::Error: Debug,
{
    let mut resync: Resync = Resync::new();
    let mut chunk = [0u8; READ_CHUNK];

    while link.is_running() {
        let len = match read_chunk(&mut rx, &mut chunk, &link) {
            Ok(0) => continue,
            Ok(len) => len,
            Err(e) => {
                warn!(error = ?e, "serial read failed, stopping bus");
                link.stop();
                return;
            }
        };
        link.mark_activity();

        let discarded_before = resync.discarded();
        let mut consumer_gone = false;
        resync.feed(&chunk[..len], |frame| {
            if consumer_gone {
                return;
            }
            trace!(
                source = frame.source(),
                destination = frame.destination(),
                register = frame.register(),
                value = frame.value(),
                "frame in"
            );
            if events.send(Event::from_frame(&frame, SystemTime::now())).is_ok() {
                link.counters.inc_received();
            } else {
                consumer_gone = true;
            }
        });
        link.counters.add_discarded((resync.discarded() - discarded_before) as u64);

        if consumer_gone {
            debug!("event queue closed, stopping bus");
            link.stop();
            return;
        }
    }
}

/// Waits for one byte, then takes whatever else is already waiting.
/// Returns 0 if the session stopped while waiting.
fn read_chunk<R>(rx: &mut R, buf: &mut [u8], link: &Link) -> Result<usize, R::Error>
where
    R: serial::Read<u8>,
{
    let mut len = 0;
    while len == 0 {
        match rx.read() {
            Ok(byte) => {
                buf[0] = byte;
                len = 1;
            }
            Err(nb::Error::WouldBlock) => {
                if !link.is_running() {
                    return Ok(0);
                }
                thread::sleep(IDLE_POLL);
            }
            Err(nb::Error::Other(e)) => return Err(e),
        }
    }

    while len < buf.len() {
        match rx.read() {
            Ok(byte) => {
                buf[len] = byte;
                len += 1;
            }
            Err(nb::Error::WouldBlock) => break,
            Err(nb::Error::Other(e)) => return Err(e),
        }
    }
    Ok(len)
}
