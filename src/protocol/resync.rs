use heapless::Deque;
use tracing::trace;

use super::frame::{Frame, FRAME_LEN};

/// Enough for a few frames. Input longer than the free space is taken in
/// pieces, with complete frames drained in between.
pub const DEFAULT_CAPACITY: usize = 64;

/// Finds frame boundaries in a byte stream that has no start delimiter.
///
/// The only boundary signal is a valid checksum, so the engine looks at the
/// six bytes at the front of its buffer: a valid frame is taken whole,
/// anything else costs exactly one byte and the window slides on. Bytes of an
/// incomplete frame stay buffered until more input arrives.
#[derive(Debug)]
pub struct Resync<const N: usize = DEFAULT_CAPACITY> {
    buffer: Deque<u8, N>,
    discarded: usize,
}

impl<const N: usize> Resync<N> {
    const HOLDS_A_FRAME: () = assert!(N >= FRAME_LEN, "resync buffer smaller than a frame");

    pub fn new() -> Self {
        let () = Self::HOLDS_A_FRAME;
        Self {
            buffer: Deque::new(),
            discarded: 0,
        }
    }

    /// Appends as much of `bytes` as fits and returns how many were taken.
    pub fn push_slice(&mut self, bytes: &[u8]) -> usize {
        let mut taken = 0;
        for byte in bytes {
            if self.buffer.push_back(*byte).is_err() {
                break;
            }
            taken += 1;
        }
        taken
    }

    /// Takes the next valid frame off the buffer, discarding garbage in front
    /// of it one byte at a time. `None` once fewer than six bytes remain.
    pub fn next_frame(&mut self) -> Option<Frame> {
        while self.buffer.len() >= FRAME_LEN {
            let mut window = [0u8; FRAME_LEN];
            for (slot, byte) in window.iter_mut().zip(self.buffer.iter()) {
                *slot = *byte;
            }

            match Frame::parse(&window) {
                Ok((frame, _)) => {
                    for _ in 0..FRAME_LEN {
                        self.buffer.pop_front();
                    }
                    return Some(frame);
                }
                Err(e) => {
                    let dropped = self.buffer.pop_front();
                    self.discarded += 1;
                    trace!(?dropped, error = %e, "no frame starts here");
                }
            }
        }
        None
    }

    /// Buffers all of `bytes`, handing every frame found to `emit` in stream
    /// order. Returns the number of frames emitted.
    pub fn feed<F>(&mut self, mut bytes: &[u8], mut emit: F) -> usize
    where
        F: FnMut(Frame),
    {
        let mut frames = 0;
        loop {
            let taken = self.push_slice(bytes);
            bytes = &bytes[taken..];
            while let Some(frame) = self.next_frame() {
                frames += 1;
                emit(frame);
            }
            if bytes.is_empty() {
                return frames;
            }
        }
    }

    /// Bytes waiting for the rest of their frame.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Total bytes thrown away while searching for frame boundaries.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

impl<const N: usize> Default for Resync<N> {
    fn default() -> Self {
        Self::new()
    }
}
