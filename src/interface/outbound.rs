use std::fmt::Debug;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use embedded_hal::blocking;
use tracing::{debug, trace, warn};

use super::link::Link;
use crate::protocol::{Encodable, Frame, WritePolicy, FRAME_LEN};

/// Transmit loop. Frames go out in queue order, minus whatever the write
/// policy refuses, each one at least [`super::link::MIN_FRAME_GAP`] after
/// the last activity on the bus.
pub(crate) fn run<W>(mut tx: W, link: Arc<Link>, commands: Receiver<Frame>, policy: WritePolicy)
where
    W: blocking::serial::Write<u8>,
    W::Error: Debug,
{
    let mut buf = [0u8; FRAME_LEN];

    while link.is_running() {
        let frame = match commands.recv() {
            Ok(frame) => frame,
            Err(_) => {
                debug!("command queue closed, transmitter done");
                return;
            }
        };
        if !link.is_running() {
            break;
        }

        if let Err(denied) = policy.check_frame(&frame) {
            debug!(value = frame.value(), "outgoing not allowed: {}", denied);
            link.counters.inc_denied();
            continue;
        }

        let bytes = match frame.encode(&mut buf) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "outgoing frame not encoded");
                link.counters.inc_write_error();
                continue;
            }
        };

        if let Some(waited) = link.wait_for_gap() {
            debug!(
                destination = frame.destination(),
                register = frame.register(),
                value = frame.value(),
                ?waited,
                "delayed outgoing"
            );
        }

        link.mark_activity();
        trace!(
            destination = frame.destination(),
            register = frame.register(),
            value = frame.value(),
            "frame out"
        );
        let result = tx.bwrite_all(bytes).and_then(|()| tx.bflush());
        // the gap counts from the end of our own frame
        link.mark_activity();

        match result {
            Ok(()) => link.counters.inc_sent(),
            Err(e) => {
                warn!(error = ?e, "serial write failed");
                link.counters.inc_write_error();
            }
        }
    }
    debug!("bus stopped, transmitter done");
}
