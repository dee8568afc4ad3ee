//! Host-side library for the carrier-board serial link.
//!
//! [`Link`] owns the serial device and a background reader thread.
//! The reader assembles 16-byte frames and routes each by its tag
//! into a bounded per-tag queue; requests are written under a single
//! lock after flushing stale input, so request/response pairing holds
//! even with several client threads. The one unsolicited message, the
//! controller's shutdown notification, is delivered through a callback
//! instead of a queue.

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod transport;

pub use dispatcher::Link;
pub use error::{LinkError, Result};
