mod frame;
mod resync;
mod commands;
mod policy;

pub mod encoding;
pub mod registers;
pub mod types;

pub use frame::{Checksum, Frame, FrameError, FRAME_LEN};
pub use resync::{Resync, DEFAULT_CAPACITY};
pub use commands::CommandBuilder;
pub use policy::{DenyReason, WriteDenied, WritePolicy, WRITABLE_REGISTERS};
pub use encoding::{Encodable, EncodingError};
pub use registers::{Decoding, Register};
pub use types::{FanSpeed, InvalidAddress, InvalidSpeedLevel, PanelAddress, Value};
