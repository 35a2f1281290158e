//! Fixed-width little-endian wire codec.
//!
//! Every value on the wire has a width fixed by its static type:
//! - Integers encode as `size_of` bytes, least-significant byte first
//! - `[T; N]` encodes as N consecutive elements in index order 0..N-1
//!
//! No length prefixes, no tags. Message boundaries are the framer's
//! job (`wirecall-frame`); this crate only moves typed values into and
//! out of byte buffers.

pub mod cursor;
pub mod error;
pub mod wire;
pub mod writer;

pub use cursor::WireCursor;
pub use error::{CodecError, Result};
pub use wire::Wire;
pub use writer::WireWriter;
