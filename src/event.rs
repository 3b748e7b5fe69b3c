use std::time::SystemTime;

use crate::protocol::{Decoding, Frame, Register, Value};

/// A frame seen on the bus, with its value translated by register.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Event {
    pub time: SystemTime,
    pub source: u8,
    pub destination: u8,
    pub register: u8,
    #[cfg_attr(feature = "serde", serde(rename = "raw"))]
    pub raw_value: u8,
    pub value: Value,
}

impl Event {
    pub fn from_frame(frame: &Frame, time: SystemTime) -> Self {
        Event {
            time,
            source: frame.source(),
            destination: frame.destination(),
            register: frame.register(),
            raw_value: frame.value(),
            value: Decoding::for_register(frame.register()).decode(frame.value()),
        }
    }

    pub fn register_kind(&self) -> Option<Register> {
        Register::try_from(self.register).ok()
    }

    /// Another participant polling for the register named by `raw_value`.
    pub fn is_query(&self) -> bool {
        self.register == crate::protocol::registers::POLL_BYTE
    }
}
