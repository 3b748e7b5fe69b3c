use nom::number::complete::be_u8;
use nom::sequence::tuple;
use nom::IResult;
use thiserror::Error;

use super::encoding::{Encodable, EncodingError};

/// Every frame on the bus is exactly this long. There is no start delimiter.
pub const FRAME_LEN: usize = 6;

/// Sum of the five leading fields, truncated to 8 bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Checksum(pub u8);

impl Checksum {
    pub fn of(fields: &[u8]) -> Self {
        Checksum(fields.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)))
    }

    fn verify(self, received: u8) -> Result<Checksum, FrameError> {
        if self.0 == received {
            Ok(self)
        } else {
            Err(FrameError::ChecksumMismatch {
                expected: self.0,
                received,
            })
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum FrameError {
    #[error("need 6 bytes for a frame, have {available}")]
    Incomplete { available: usize },
    #[error("checksum mismatch: expected {expected:#04x}, received {received:#04x}")]
    ChecksumMismatch { expected: u8, received: u8 },
}

/// One 6-byte wire packet.
///
/// The same field order (system, source, destination, register, value,
/// checksum) is used for both directions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Frame {
    system: u8,
    source: u8,
    destination: u8,
    register: u8,
    value: u8,
    checksum: Checksum,
}

impl Frame {
    pub fn new(system: u8, source: u8, destination: u8, register: u8, value: u8) -> Self {
        Self {
            system,
            source,
            destination,
            register,
            value,
            checksum: Checksum::of(&[system, source, destination, register, value]),
        }
    }

    /// Parses one frame from the front of `data`, returning it together with
    /// whatever follows it.
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8]), FrameError> {
        if data.len() < FRAME_LEN {
            return Err(FrameError::Incomplete {
                available: data.len(),
            });
        }

        match fields(data) {
            Ok((remaining, (system, source, destination, register, value, received))) => {
                let checksum = Checksum::of(&[system, source, destination, register, value])
                    .verify(received)?;
                let frame = Self {
                    system,
                    source,
                    destination,
                    register,
                    value,
                    checksum,
                };
                Ok((frame, remaining))
            }
            Err(_) => Err(FrameError::Incomplete {
                available: data.len(),
            }),
        }
    }

    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        [
            self.system,
            self.source,
            self.destination,
            self.register,
            self.value,
            self.checksum.0,
        ]
    }

    pub fn system(&self) -> u8 {
        self.system
    }

    pub fn source(&self) -> u8 {
        self.source
    }

    pub fn destination(&self) -> u8 {
        self.destination
    }

    pub fn register(&self) -> u8 {
        self.register
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    /// Register 0 marks a poll: the value byte names the register being asked for.
    pub fn is_query(&self) -> bool {
        self.register == 0
    }
}

impl Encodable for Frame {
    fn encode<'a>(&self, into: &'a mut [u8]) -> Result<&'a [u8], EncodingError> {
        if into.len() != FRAME_LEN {
            Err(EncodingError {
                expected: FRAME_LEN,
                actual: into.len(),
            })
        } else {
            into.copy_from_slice(&self.to_bytes());
            Ok(into)
        }
    }
}

fn fields(input: &[u8]) -> IResult<&[u8], (u8, u8, u8, u8, u8, u8)> {
    tuple((be_u8, be_u8, be_u8, be_u8, be_u8, be_u8))(input)
}
