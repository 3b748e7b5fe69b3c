use thiserror::Error;

use crate::protocol::{InvalidAddress, InvalidSpeedLevel};

#[derive(Debug, Error)]
pub enum OpenError {
    #[error(transparent)]
    InvalidAddress(#[from] InvalidAddress),
    #[error("failed to start the {name} loop")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// What a caller can learn synchronously about a command. Everything after
/// the queue (the write gate, the serial write) is reported through
/// [`crate::StatsSnapshot`] and the log instead.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CommandError {
    #[error(transparent)]
    InvalidSpeedLevel(#[from] InvalidSpeedLevel),
    #[error("bus session has stopped")]
    Closed,
}
