use bytes::{BufMut, BytesMut};

use crate::wire::Wire;

/// Appends wire-encoded values to an outgoing message buffer.
///
/// The buffer is borrowed for the duration of one message's
/// serialization; the caller (the call synchronizer) owns it and
/// decides when the message is complete.
pub struct WireWriter<'a> {
    buf: &'a mut BytesMut,
}

impl<'a> WireWriter<'a> {
    pub fn new(buf: &'a mut BytesMut) -> Self {
        Self { buf }
    }

    /// Append one value.
    pub fn put<T: Wire>(&mut self, value: &T) {
        value.put(self);
    }

    pub(crate) fn extend(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }
}
