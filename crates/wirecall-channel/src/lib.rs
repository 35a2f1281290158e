//! Blocking call/reply synchronization for fixed-frame RPC channels.
//!
//! This is the core value-add layer of wirecall. A [`Channel`] lets
//! any number of application threads invoke remote procedures while a
//! single dedicated thread feeds received bytes back in:
//!
//! - at most one call is in flight per channel at a time;
//! - the caller blocks until its reply is framed and handed off;
//! - partial wire data is never consumed, orphan replies never stall
//!   the receive pipeline.
//!
//! [`ReplyPump`] is the receive thread's loop, and [`Service`] /
//! [`serve_requests`] run the responder side of a channel so a peer
//! can live in the same process or across a socket.

pub mod channel;
pub mod error;
pub mod pump;
pub mod service;
pub mod transport;

pub use channel::{CallConfig, Channel};
pub use error::{CallError, DispatchError, Result};
pub use pump::ReplyPump;
pub use service::{serve_requests, Service};
pub use transport::{IoTransport, Transport};
