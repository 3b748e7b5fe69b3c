use core::fmt;

use thiserror::Error;

use super::frame::Frame;
use super::registers::{Register, POLL_BYTE};

/// The only registers that may ever be written, whatever the configuration.
pub const WRITABLE_REGISTERS: [Register; 4] = [
    Register::CurrentFanSpeed,
    Register::MaxFanSpeed,
    Register::DefaultFanSpeed,
    Register::Program,
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DenyReason {
    WritingDisabled,
    NotWritable,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::WritingDisabled => f.write_str("writing is disabled"),
            DenyReason::NotWritable => f.write_str("register is not writable"),
        }
    }
}

#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("write to register {register:#04x} denied, {reason}")]
pub struct WriteDenied {
    pub register: u8,
    pub reason: DenyReason,
}

/// Gate in front of the transmitter. Polls always pass; a write needs both
/// the global switch and a register on [`WRITABLE_REGISTERS`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct WritePolicy {
    write_enabled: bool,
}

impl WritePolicy {
    pub fn new(write_enabled: bool) -> Self {
        Self { write_enabled }
    }

    pub fn write_enabled(&self) -> bool {
        self.write_enabled
    }

    pub fn check(&self, register: u8) -> Result<(), WriteDenied> {
        if register == POLL_BYTE {
            return Ok(());
        }
        if !self.write_enabled {
            return Err(WriteDenied {
                register,
                reason: DenyReason::WritingDisabled,
            });
        }
        if WRITABLE_REGISTERS.iter().any(|r| r.id() == register) {
            Ok(())
        } else {
            Err(WriteDenied {
                register,
                reason: DenyReason::NotWritable,
            })
        }
    }

    pub fn is_write_allowed(&self, register: u8) -> bool {
        self.check(register).is_ok()
    }

    pub fn check_frame(&self, frame: &Frame) -> Result<(), WriteDenied> {
        self.check(frame.register())
    }
}
