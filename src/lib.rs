#![cfg_attr(not(feature = "std"), no_std)]

//! vallox_rs485
//!
//! Protocol engine for the RS485 bus between Vallox ventilation units and
//! their remote control panels. It decodes the raw, noisy byte stream into
//! addressed events and sends polls and register writes as a panel of its
//! own, within the bus timing rules.
//!
//! The [`protocol`] module is `no_std` and allocation-free. The bus session,
//! [`ValloxBus`], needs threads and is behind the default `std` feature.
//!
//! There is no code to open a serial device here. The bus runs at 9600 baud,
//! 8 data bits, no parity, 1 stop bit (9600 8N1). Configure your port as such
//! and hand its receive and transmit halves to [`ValloxBus::open`].
//!
//! ## Reading frames
//!
//! Frames are six bytes with no start marker, so the stream is scanned for a
//! window with a valid checksum:
//!
//! ```
//! use vallox_rs485::protocol::{Resync, Decoding, Register};
//!
//! let mut resync: Resync = Resync::new();
//!
//! // Two bytes of line noise, then the controller telling all panels the
//! // fan runs at speed 3.
//! let bytes = [0x42, 0x00, 0x01, 0x11, 0x20, 0x29, 0x07, 0x62];
//!
//! resync.feed(&bytes, |frame| {
//!     assert_eq!(Register::try_from(frame.register()), Ok(Register::CurrentFanSpeed));
//!
//!     let value = Decoding::for_register(frame.register()).decode(frame.value());
//!     println!("{:#04x} -> {}", frame.destination(), value);
//! });
//!
//! assert_eq!(resync.discarded(), 2);
//! ```
//!
//! ## Building frames
//!
//! ```
//! use vallox_rs485::protocol::{CommandBuilder, PanelAddress, Register, Frame};
//!
//! let panel = CommandBuilder::new(PanelAddress::try_from(0x27).unwrap());
//!
//! assert_eq!(
//!     //       ---- domain
//!     //       |||| ---- from panel 0x27
//!     //       |||| |||| ---- to mainboard 1
//!     //       |||| |||| |||| ---- poll
//!     //       |||| |||| |||| |||| ---- register wanted: outdoor temperature
//!     //       |||| |||| |||| |||| |||| ---- checksum
//!     //       |||| |||| |||| |||| |||| ||||
//!     [      0x01, 0x27, 0x11, 0x00, 0x32, 0x6b],
//!     panel.query(Register::OutdoorTemp).to_bytes()
//! );
//!
//! let parsed = Frame::parse(&[0x01, 0x27, 0x11, 0x00, 0x32, 0x6b]);
//! assert_eq!(parsed.map(|(frame, _)| frame.value()), Ok(0x32));
//! ```
//!
//! ## Running a panel
//!
//! ```no_run
//! use vallox_rs485::{Config, OpenError, SplitSerial, ValloxBus};
//!
//! fn monitor<S: SplitSerial>(serial: S) -> Result<(), OpenError> {
//!     let bus = ValloxBus::open(Config::default().with_write_enabled(true), serial)?;
//!
//!     if let Err(e) = bus.set_speed(3) {
//!         eprintln!("speed not changed: {}", e);
//!     }
//!
//!     for event in bus.events().iter().filter(|e| bus.for_me(e)) {
//!         println!("{:#04x} = {}", event.register, event.value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod protocol;

#[cfg(feature = "std")]
mod error;
#[cfg(feature = "std")]
mod event;
#[cfg(feature = "std")]
pub mod interface;

#[doc(inline)]
pub use protocol::*;

#[cfg(feature = "std")]
pub use error::{CommandError, OpenError};
#[cfg(feature = "std")]
pub use event::Event;
#[cfg(feature = "std")]
pub use interface::{Config, SplitSerial, StatsSnapshot, ValloxBus, MIN_FRAME_GAP};
