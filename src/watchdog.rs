//! Watchdog timer configuration message.
//!
//! # Layout
//!
//! ```text
//! +--------+---------------------------------------------------+
//! | Offset | Description                                       |
//! +--------+---------------------------------------------------+
//! | 0      | Tag (b'C')                                        |
//! | 1      | Flags: bit 0 = write, bit 1 = success (resp only),|
//! |        | bit 2 = enable                                    |
//! | 2..4   | u16 LE, timeout in seconds                        |
//! | 4..6   | u16 LE, maximum restart attempts                  |
//! | 6..16  | Reserved, zero                                    |
//! +--------+---------------------------------------------------+
//! ```
//!
//! A read request (write=0) returns the currently configured values
//! without changing them. In a response, the enable flag reflects the
//! watchdog's actual armed state after the request was handled.

use crate::frame::{Frame, Tag, FRAME_LEN};

pub const IDX_FLAGS: usize = 1;
pub const IDX_TIMEOUT: usize = 2;
pub const IDX_RETRIES: usize = 4;
pub const IDX_RESV: usize = 6;

pub const FLAG_WRITE: u8 = 1 << 0;
pub const FLAG_SUCCESS: u8 = 1 << 1;
pub const FLAG_ENABLE: u8 = 1 << 2;

/// Decoded watchdog message; shared by requests and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchdogPacket {
    /// Write (true) or read (false) operation.
    pub write: bool,
    /// Requested or actual armed state.
    pub enable: bool,
    /// Success flag; meaningful in responses only.
    pub success: bool,
    /// Dead-man timeout in seconds.
    pub timeout_s: u16,
    /// Restart attempts before the watchdog disarms itself.
    pub max_retries: u16,
}

fn pack_flags(pkt: &WatchdogPacket) -> u8 {
    let mut flags = 0x00;
    if pkt.write {
        flags |= FLAG_WRITE;
    }
    if pkt.success {
        flags |= FLAG_SUCCESS;
    }
    if pkt.enable {
        flags |= FLAG_ENABLE;
    }
    flags
}

/// Pack a watchdog request. On reads the data fields are zero.
pub fn req_pack(buf: &mut Frame, pkt: &WatchdogPacket) {
    buf.fill(0);
    buf[0] = Tag::Watchdog as u8;
    buf[IDX_FLAGS] = pack_flags(pkt) & !FLAG_SUCCESS;
    if pkt.write {
        buf[IDX_TIMEOUT..IDX_TIMEOUT + 2].copy_from_slice(&pkt.timeout_s.to_le_bytes());
        buf[IDX_RETRIES..IDX_RETRIES + 2].copy_from_slice(&pkt.max_retries.to_le_bytes());
    }
}

/// Pack a watchdog response.
pub fn resp_pack(buf: &mut Frame, pkt: &WatchdogPacket) {
    buf[0] = Tag::Watchdog as u8;
    buf[IDX_FLAGS] = pack_flags(pkt);
    buf[IDX_TIMEOUT..IDX_TIMEOUT + 2].copy_from_slice(&pkt.timeout_s.to_le_bytes());
    buf[IDX_RETRIES..IDX_RETRIES + 2].copy_from_slice(&pkt.max_retries.to_le_bytes());
    buf[IDX_RESV..FRAME_LEN].fill(0);
}

/// Unpack a watchdog message.
pub fn unpack(buf: &Frame) -> WatchdogPacket {
    WatchdogPacket {
        write: buf[IDX_FLAGS] & FLAG_WRITE != 0,
        enable: buf[IDX_FLAGS] & FLAG_ENABLE != 0,
        success: buf[IDX_FLAGS] & FLAG_SUCCESS != 0,
        timeout_s: u16::from_le_bytes([buf[IDX_TIMEOUT], buf[IDX_TIMEOUT + 1]]),
        max_retries: u16::from_le_bytes([buf[IDX_RETRIES], buf[IDX_RETRIES + 1]]),
    }
}
