//! Graceful-shutdown message.
//!
//! The controller sends this frame to the host unsolicited when the
//! shutdown button is pressed for a graceful duration; the host sends
//! the same frame back as acknowledgement that it is powering itself
//! off. Neither direction gets a reply.
//!
//! # Layout
//!
//! ```text
//! +--------+----------------------------------------------+
//! | Offset | Description                                  |
//! +--------+----------------------------------------------+
//! | 0      | Tag (b'D')                                   |
//! | 1      | Flags: bit 0 = success                       |
//! | 2..16  | Reserved, zero                               |
//! +--------+----------------------------------------------+
//! ```

use crate::frame::{Frame, Tag};

pub const IDX_FLAGS: usize = 1;

pub const FLAG_SUCCESS: u8 = 1 << 0;

/// Pack the host's acknowledgement frame.
pub fn req_pack(buf: &mut Frame) {
    buf.fill(0);
    buf[0] = Tag::Shutdown as u8;
}

/// Pack the controller's unsolicited notification frame.
pub fn resp_pack(buf: &mut Frame, success: bool) {
    buf.fill(0);
    buf[0] = Tag::Shutdown as u8;
    if success {
        buf[IDX_FLAGS] = FLAG_SUCCESS;
    }
}

/// Unpack the success flag.
pub fn unpack(buf: &Frame) -> bool {
    buf[IDX_FLAGS] & FLAG_SUCCESS != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAME_LEN;

    #[test]
    fn test_notification_round_trip() {
        let mut buf: Frame = [0xFFu8; FRAME_LEN];
        resp_pack(&mut buf, true);
        assert_eq!(buf[0], b'D');
        assert!(unpack(&buf));
        assert!(buf[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_ack_has_no_flags() {
        let mut buf: Frame = [0xFFu8; FRAME_LEN];
        req_pack(&mut buf);
        assert_eq!(buf[0], b'D');
        assert!(!unpack(&buf));
    }
}
