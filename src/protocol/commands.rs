use super::frame::Frame;
use super::registers::{Register, DOMAIN, MAINBOARD_1, PANELS, POLL_BYTE};
use super::types::{FanSpeed, PanelAddress};

/// Builds outbound frames sent from one panel address.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandBuilder {
    source: PanelAddress,
}

impl CommandBuilder {
    pub fn new(source: PanelAddress) -> Self {
        Self { source }
    }

    pub fn source(&self) -> PanelAddress {
        self.source
    }

    /// Asks the primary controller for a register. Polls carry the poll byte
    /// in the register field and the wanted register as the value.
    pub fn query(&self, register: impl Into<u8>) -> Frame {
        Frame::new(DOMAIN, self.source.get(), MAINBOARD_1, POLL_BYTE, register.into())
    }

    pub fn write(&self, destination: u8, register: impl Into<u8>, value: u8) -> Frame {
        Frame::new(DOMAIN, self.source.get(), destination, register.into(), value)
    }

    /// The controller write plus the same value broadcast to every panel, so
    /// remote displays follow the change.
    pub fn fan_speed(&self, register: Register, speed: FanSpeed) -> [Frame; 2] {
        let value = speed.to_raw();
        [
            self.write(MAINBOARD_1, register, value),
            self.write(PANELS, register, value),
        ]
    }

    /// One poll per catalog register, in catalog order.
    pub fn init_queries(&self) -> impl Iterator<Item = Frame> + '_ {
        Register::ALL.iter().map(move |r| self.query(*r))
    }
}
