//! Link echo test message.
//!
//! # Layout
//!
//! ```text
//! +--------+----------------------------------------------+
//! | Offset | Description                                  |
//! +--------+----------------------------------------------+
//! | 0      | Tag (b'E')                                   |
//! | 1      | Flags: bit 0 = success (response only)       |
//! | 2..16  | Echo payload                                 |
//! +--------+----------------------------------------------+
//! ```
//!
//! The host fills the payload with a rolling counter byte; the
//! controller copies the request payload into the response and sets
//! the success flag.

use crate::frame::{Frame, Tag, FRAME_LEN};

pub const IDX_FLAGS: usize = 1;
pub const IDX_DATA: usize = 2;

pub const FLAG_SUCCESS: u8 = 1 << 0;

/// Pack a ping request. The payload bytes carry `counter + 1` so that
/// consecutive pings are distinguishable on a wire trace.
pub fn req_pack(buf: &mut Frame, counter: u8) {
    buf[0] = Tag::Ping as u8;
    buf[IDX_FLAGS] = 0x00;
    let fill = counter.wrapping_add(1);
    for b in buf[IDX_DATA..].iter_mut() {
        *b = fill;
    }
}

/// Pack a ping response from the request it answers.
pub fn resp_pack(buf: &mut Frame, req: &Frame, success: bool) {
    buf[0] = Tag::Ping as u8;
    buf[IDX_FLAGS] = if success { FLAG_SUCCESS } else { 0x00 };
    buf[IDX_DATA..FRAME_LEN].copy_from_slice(&req[IDX_DATA..FRAME_LEN]);
}

/// Unpack the success flag from a ping response.
pub fn resp_unpack(buf: &Frame) -> bool {
    buf[IDX_FLAGS] & FLAG_SUCCESS != 0
}

/// True when a response echoes the payload of the given request.
pub fn echo_matches(req: &Frame, resp: &Frame) -> bool {
    req[IDX_DATA..] == resp[IDX_DATA..]
}
