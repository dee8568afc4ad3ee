//! Shared packet codec for the carrier-board serial link.
//!
//! The host and the board controller exchange fixed 16-byte frames over
//! a UART. Byte 0 is the message tag, which doubles as the
//! synchronization marker; the rest of the frame is a per-message
//! payload with little-endian multi-byte fields and zero-filled
//! reserved bytes. Request and response frames of a given tag share
//! the same layout.
//!
//! This crate is `no_std` and stateless: both endpoints compile
//! against the same tables, and every unpack function is total over
//! any 16-byte input. Validity is judged by the caller via the tag
//! and the per-message success flag, never by a decode error.

#![cfg_attr(not(test), no_std)]

pub mod fan_pwm;
pub mod frame;
pub mod ping;
pub mod shutdown;
pub mod temperature;
pub mod version;
pub mod watchdog;

pub use frame::{Frame, Tag, FRAME_LEN};
