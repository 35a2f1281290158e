use tracing::trace;

use crate::catalog::CommandCatalog;

/// Result of inspecting a (possibly partial) byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The buffer starts with one complete message of `len` bytes.
    Complete { len: usize },
    /// More bytes are needed; `needed` is the total length the message
    /// will have once enough bytes arrive (1 when even the identifier
    /// byte is missing).
    Incomplete { needed: usize },
    /// The leading byte is not in the catalog. The transport must
    /// discard or resynchronize; this layer does not recover.
    UnknownCommand { id: u8 },
}

impl FrameStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, FrameStatus::Complete { .. })
    }
}

/// Determine whether `buf` holds a complete message.
///
/// Pure and idempotent: nothing is consumed, and calling it on a
/// growing prefix resolves monotonically (Incomplete until the
/// catalog length is reached, then Complete — or UnknownCommand from
/// the first byte onward).
pub fn frame_message(catalog: &CommandCatalog, buf: &[u8]) -> FrameStatus {
    let Some(&id) = buf.first() else {
        return FrameStatus::Incomplete { needed: 1 };
    };
    match catalog.wire_len(id) {
        None => {
            trace!(id, "unknown command identifier");
            FrameStatus::UnknownCommand { id }
        }
        Some(len) if buf.len() < len => FrameStatus::Incomplete { needed: len },
        Some(len) => FrameStatus::Complete { len },
    }
}
