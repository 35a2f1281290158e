/// Errors that can occur while decoding wire values.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The read cursor ran out of bytes mid-value.
    ///
    /// Upstream framing guarantees complete messages, so hitting this
    /// means the decode side disagrees with the command catalog about
    /// a message's layout.
    #[error("short buffer: value needs {needed} byte(s), {available} available")]
    ShortBuffer { needed: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;
