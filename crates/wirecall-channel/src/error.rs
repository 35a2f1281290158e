use std::time::Duration;

/// Errors surfaced to the caller of a remote procedure.
///
/// All of these mean "no reply obtained" — a partial or corrupt
/// message never reaches the stub, because the framer rejects it
/// first.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The transport failed to send the request.
    #[error("transmit failed: {0}")]
    Transmit(#[from] std::io::Error),

    /// No reply arrived within the configured window.
    #[error("no reply within {0:?}")]
    Timeout(Duration),

    /// A framed reply arrived, but for a different procedure.
    #[error("reply identifier mismatch (expected {expected}, got {got})")]
    ReplyMismatch { expected: u8, got: u8 },

    /// The reply payload did not decode as declared.
    #[error("reply decode failed: {0}")]
    Decode(#[from] wirecall_codec::CodecError),
}

pub type Result<T> = std::result::Result<T, CallError>;

/// Errors that stop a receive or serve loop.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// An I/O error occurred while reading the stream.
    #[error("receive I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream closed with a partial message still buffered.
    #[error("stream closed mid-message")]
    ConnectionClosed,

    /// The stream carries an identifier the catalog does not know.
    /// Resynchronization is the transport's decision, not ours.
    #[error("unknown command identifier {id} in stream")]
    UnknownCommand { id: u8 },

    /// A request payload did not decode as declared.
    #[error("request decode failed: {0}")]
    Decode(#[from] wirecall_codec::CodecError),
}
