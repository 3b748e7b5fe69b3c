use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("destination buffer holds {actual} bytes, {expected} required")]
pub struct EncodingError {
    pub expected: usize,
    pub actual: usize,
}

/// Writes a value in its wire form into a caller-supplied buffer, returning
/// the bytes written.
pub trait Encodable {
    fn encode<'a>(&self, into: &'a mut [u8]) -> Result<&'a [u8], EncodingError>;
}
