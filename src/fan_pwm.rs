//! Fan PWM duty read/write message.
//!
//! # Layout
//!
//! ```text
//! +--------+---------------------------------------------------+
//! | Offset | Description                                       |
//! +--------+---------------------------------------------------+
//! | 0      | Tag (b'B')                                        |
//! | 1      | Target bitmask: bit N-1 targets fan N             |
//! | 2      | Flags: bit 0 = write, bit 1 = success (resp only) |
//! | 3      | Fan 1 duty, 0..=100 (%)                           |
//! | 4..16  | Reserved, zero                                    |
//! +--------+---------------------------------------------------+
//! ```
//!
//! The duty travels as a whole percentage byte; the API exposes it as
//! a 0.0..=1.0 fraction, scaled by 100 on the wire.

use crate::frame::{Frame, Tag, FRAME_LEN};

pub const IDX_TARGET: usize = 1;
pub const IDX_FLAGS: usize = 2;
pub const IDX_FAN1_DUTY: usize = 3;
pub const IDX_RESV: usize = 4;

pub const FLAG_WRITE: u8 = 1 << 0;
pub const FLAG_SUCCESS: u8 = 1 << 1;

const LSB_PER_UNIT: f32 = 100.0;

/// Decoded fan PWM message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanPwm {
    /// Fan number, 1-based.
    pub fan_id: u8,
    /// Write (true) or read (false) operation.
    pub write: bool,
    /// Duty cycle as a fraction, 0.0..=1.0.
    pub duty: f32,
    /// Success flag; meaningful in responses only.
    pub success: bool,
}

fn pack_duty(duty: f32) -> u8 {
    let clamped = duty.clamp(0.0, 1.0);
    (clamped * LSB_PER_UNIT) as u8
}

/// Pack a fan PWM request. On reads the duty field is zero.
pub fn req_pack(buf: &mut Frame, fan_id: u8, write: bool, duty: f32) {
    buf.fill(0);
    buf[0] = Tag::FanPwm as u8;
    buf[IDX_TARGET] = 1 << (fan_id - 1);
    if write {
        buf[IDX_FLAGS] = FLAG_WRITE;
        buf[IDX_FAN1_DUTY] = pack_duty(duty);
    }
}

/// Pack a fan PWM response.
pub fn resp_pack(buf: &mut Frame, fan_id: u8, write: bool, duty: f32, success: bool) {
    buf[0] = Tag::FanPwm as u8;
    buf[IDX_TARGET] = 1 << (fan_id - 1);
    buf[IDX_FLAGS] = 0x00;
    if write {
        buf[IDX_FLAGS] |= FLAG_WRITE;
    }
    if success {
        buf[IDX_FLAGS] |= FLAG_SUCCESS;
    }
    buf[IDX_FAN1_DUTY] = pack_duty(duty);
    buf[IDX_RESV..FRAME_LEN].fill(0);
}

/// Unpack a fan PWM message (request or response; the success flag is
/// only meaningful for responses).
pub fn unpack(buf: &Frame) -> FanPwm {
    // Lowest set target bit wins; only one fan is addressed per frame.
    let mut fan_id = 0;
    for bit in 0..8 {
        if buf[IDX_TARGET] & (1 << bit) != 0 {
            fan_id = bit + 1;
            break;
        }
    }
    FanPwm {
        fan_id,
        write: buf[IDX_FLAGS] & FLAG_WRITE != 0,
        duty: buf[IDX_FAN1_DUTY] as f32 / LSB_PER_UNIT,
        success: buf[IDX_FLAGS] & FLAG_SUCCESS != 0,
    }
}
