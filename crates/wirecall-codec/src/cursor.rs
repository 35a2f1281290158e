use crate::error::{CodecError, Result};
use crate::wire::Wire;

/// Read cursor over one received message.
///
/// Scoped to a single decode operation — each reply gets a fresh
/// cursor over its framed bytes, so no decode state outlives the
/// message it belongs to.
pub struct WireCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Decode one value, advancing past its encoding.
    pub fn take<T: Wire>(&mut self) -> Result<T> {
        T::take(self)
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn take_bytes(&mut self, width: usize) -> Result<&'a [u8]> {
        if self.remaining() < width {
            return Err(CodecError::ShortBuffer {
                needed: width,
                available: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + width];
        self.pos += width;
        Ok(bytes)
    }
}
