//! The bus session: one serial port shared by a receive loop and a transmit
//! loop, each on its own thread.

mod inbound;
mod link;
mod outbound;

use std::fmt::Debug;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use embedded_hal::{blocking, serial};
use tracing::{debug, info, warn};

use crate::error::{CommandError, OpenError};
use crate::event::Event;
use crate::protocol::registers::PANELS;
use crate::protocol::{CommandBuilder, FanSpeed, Frame, PanelAddress, Register, WritePolicy};

use self::link::Link;
pub use self::link::{StatsSnapshot, MIN_FRAME_GAP};

/// A serial port that can be split into halves owned by different threads.
pub trait SplitSerial {
    type Rx: serial::Read<u8, Error = Self::RxError> + Send + 'static;
    type Tx: blocking::serial::Write<u8, Error = Self::TxError> + Send + 'static;
    type RxError: Debug;
    type TxError: Debug;

    fn split(self) -> (Self::Rx, Self::Tx);
}

impl<R, W> SplitSerial for (R, W)
where
    R: serial::Read<u8> + Send + 'static,
    R::Error: Debug,
    W: blocking::serial::Write<u8> + Send + 'static,
    W::Error: Debug,
{
    type Rx = R;
    type Tx = W;
    type RxError = R::Error;
    type TxError = W::Error;

    fn split(self) -> (R, W) {
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Our own panel address on the bus, 0x20 to 0x2f.
    pub client_address: u8,
    /// Master switch for register writes. Off by default.
    pub write_enabled: bool,
    /// Events buffered before the receive loop stops reading.
    pub event_capacity: usize,
    /// Commands buffered before callers block. Never less than one startup
    /// burst of polls.
    pub command_capacity: usize,
    /// Poll every known register right after opening.
    pub init_queries: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            client_address: PanelAddress::default().get(),
            write_enabled: false,
            event_capacity: 100,
            command_capacity: 128,
            init_queries: true,
        }
    }
}

impl Config {
    pub fn with_client_address(mut self, address: u8) -> Self {
        self.client_address = address;
        self
    }

    pub fn with_write_enabled(mut self, enabled: bool) -> Self {
        self.write_enabled = enabled;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    pub fn with_init_queries(mut self, enabled: bool) -> Self {
        self.init_queries = enabled;
        self
    }
}

/// A panel on the Vallox bus.
///
/// Decoded frames arrive on [`events`](Self::events); commands are queued
/// and sent in order by the transmit thread. Dropping the bus stops both
/// threads. The session also stops when the serial port fails, or at the
/// next received frame once every clone of the event receiver is gone.
pub struct ValloxBus {
    builder: CommandBuilder,
    policy: WritePolicy,
    commands: Sender<Frame>,
    events: Receiver<Event>,
    link: Arc<Link>,
}

impl ValloxBus {
    pub fn open<S: SplitSerial>(config: Config, serial: S) -> Result<Self, OpenError> {
        let address = PanelAddress::try_from(config.client_address)?;
        let builder = CommandBuilder::new(address);
        let policy = WritePolicy::new(config.write_enabled);

        let command_capacity = if config.init_queries {
            config.command_capacity.max(Register::ALL.len())
        } else {
            config.command_capacity
        };
        let (commands, command_rx) = bounded(command_capacity);
        let (event_tx, events) = bounded(config.event_capacity);

        if config.init_queries {
            for frame in builder.init_queries() {
                // fits: the queue is at least as long as the burst
                if commands.try_send(frame).is_err() {
                    debug!(register = frame.value(), "startup poll not queued");
                }
            }
        }

        let link = Arc::new(Link::new());
        let (rx, tx) = serial.split();

        let inbound_link = Arc::clone(&link);
        thread::Builder::new()
            .name("vallox-rx".into())
            .spawn(move || inbound::run(rx, inbound_link, event_tx))
            .map_err(|source| OpenError::Spawn {
                name: "receive",
                source,
            })?;

        let outbound_link = Arc::clone(&link);
        let spawned = thread::Builder::new()
            .name("vallox-tx".into())
            .spawn(move || outbound::run(tx, outbound_link, command_rx, policy));
        if let Err(source) = spawned {
            link.stop();
            return Err(OpenError::Spawn {
                name: "transmit",
                source,
            });
        }

        info!(
            address = address.get(),
            write_enabled = config.write_enabled,
            "vallox bus open"
        );
        Ok(ValloxBus {
            builder,
            policy,
            commands,
            events,
            link,
        })
    }

    pub fn events(&self) -> &Receiver<Event> {
        &self.events
    }

    pub fn address(&self) -> PanelAddress {
        self.builder.source()
    }

    pub fn write_enabled(&self) -> bool {
        self.policy.write_enabled()
    }

    /// Whether `event` is addressed to all panels or to this one.
    pub fn for_me(&self, event: &Event) -> bool {
        event.destination == PANELS || event.destination == self.address().get()
    }

    /// Polls the controller for a register; the answer arrives as an event.
    pub fn query(&self, register: impl Into<u8>) -> Result<(), CommandError> {
        self.enqueue(self.builder.query(register))
    }

    /// Queues a raw register write. It still has to pass the write policy.
    pub fn write_register(
        &self,
        destination: u8,
        register: impl Into<u8>,
        value: u8,
    ) -> Result<(), CommandError> {
        self.enqueue(self.builder.write(destination, register, value))
    }

    pub fn set_speed(&self, level: u8) -> Result<(), CommandError> {
        self.set_fan_speed(Register::CurrentFanSpeed, level)
    }

    pub fn set_default_fan_speed(&self, level: u8) -> Result<(), CommandError> {
        self.set_fan_speed(Register::DefaultFanSpeed, level)
    }

    pub fn set_max_fan_speed(&self, level: u8) -> Result<(), CommandError> {
        self.set_fan_speed(Register::MaxFanSpeed, level)
    }

    /// False once the receive loop has hit a read error or lost its consumer.
    pub fn is_running(&self) -> bool {
        self.link.is_running()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.link.counters.snapshot()
    }

    fn set_fan_speed(&self, register: Register, level: u8) -> Result<(), CommandError> {
        let speed = match FanSpeed::new(level) {
            Ok(speed) => speed,
            Err(e) => {
                warn!(level, "received invalid speed");
                return Err(e.into());
            }
        };
        debug!(level, ?register, "received set speed");
        for frame in self.builder.fan_speed(register, speed).iter() {
            self.enqueue(*frame)?;
        }
        Ok(())
    }

    fn enqueue(&self, frame: Frame) -> Result<(), CommandError> {
        if !self.link.is_running() {
            return Err(CommandError::Closed);
        }
        self.commands.send(frame).map_err(|_| CommandError::Closed)
    }
}

impl Drop for ValloxBus {
    fn drop(&mut self) {
        // the receive thread sees this on its next idle poll; the transmit
        // thread ends when the command sender goes away with us
        self.link.stop();
    }
}
