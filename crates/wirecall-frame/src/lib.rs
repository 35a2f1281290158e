//! Catalog-driven message framing.
//!
//! Wire format: `[1-byte command identifier][payload]`. There is no
//! length field on the wire — every identifier maps to a fixed total
//! message length through a [`CommandCatalog`] built at generation
//! time. Framing a byte stream therefore only needs the first byte
//! and a catalog lookup.

pub mod catalog;
pub mod framer;

pub use catalog::CommandCatalog;
pub use framer::{frame_message, FrameStatus};
