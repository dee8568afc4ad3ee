//! Board temperature and tachometer message.
//!
//! # Layout
//!
//! ```text
//! +--------+----------------------------------------------------+
//! | Offset | Description                                        |
//! +--------+----------------------------------------------------+
//! | 0      | Tag (b'A')                                         |
//! | 1      | Flags: bit 0 = success (response only)             |
//! | 2..4   | i16 LE, external sensor 1 temperature (degC x 100) |
//! | 4..6   | i16 LE, external sensor 2 temperature (degC x 100) |
//! | 6..8   | i16 LE, external sensor 3 temperature (degC x 100) |
//! | 8..10  | i16 LE, external sensor 4 temperature (degC x 100) |
//! | 10..12 | i16 LE, controller temperature (degC x 100)        |
//! | 12..14 | u16 LE, fan 1 speed (RPM)                          |
//! | 14..16 | Reserved, zero                                     |
//! +--------+----------------------------------------------------+
//! ```
//!
//! Temperatures use the board's sign convention, which is not native
//! two's complement: the magnitude is scaled by 100 into a u16 and,
//! for negative values, that u16 is then two's-complement negated.
//! Decoders must undo exactly this (detect bit 15, reverse the
//! negation, divide by 100) to interoperate with the controller.

use crate::frame::{Frame, Tag, FRAME_LEN};

pub const IDX_FLAGS: usize = 1;
pub const IDX_SENSOR1: usize = 2;
pub const IDX_SELF: usize = 10;
pub const IDX_FAN1_RPM: usize = 12;
pub const IDX_RESV: usize = 14;

pub const FLAG_SUCCESS: u8 = 1 << 0;

/// Number of external temperature channels on the carrier board.
pub const NUM_EXTERNAL_SENSORS: usize = 4;

/// Scale factor between degrees Celsius and the on-wire u16.
const LSB_PER_DEGREE: f32 = 100.0;

/// Decoded temperature response.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readings {
    /// External sensor channels 1..=4.
    pub external: [f32; NUM_EXTERNAL_SENSORS],
    /// The controller's onboard sensor.
    pub controller: f32,
    /// Fan 1 tachometer reading.
    pub fan1_rpm: u16,
}

/// Encode one temperature at the given offset using the board's
/// sign-magnitude-then-complement convention.
fn pack_celsius(buf: &mut Frame, idx: usize, value: f32) {
    let data: u16 = if value < 0.0 {
        let magnitude = (-value * LSB_PER_DEGREE) as u16;
        (!magnitude).wrapping_add(1)
    } else {
        (value * LSB_PER_DEGREE) as u16
    };
    buf[idx] = (data & 0xFF) as u8;
    buf[idx + 1] = (data >> 8) as u8;
}

/// Decode one temperature at the given offset.
fn unpack_celsius(buf: &Frame, idx: usize) -> f32 {
    let raw = u16::from_le_bytes([buf[idx], buf[idx + 1]]);
    if raw & 0x8000 != 0 {
        let magnitude = !(raw.wrapping_sub(1));
        -(magnitude as f32) / LSB_PER_DEGREE
    } else {
        raw as f32 / LSB_PER_DEGREE
    }
}

/// Pack a temperature read request. All data fields are zero.
pub fn req_pack(buf: &mut Frame) {
    buf.fill(0);
    buf[0] = Tag::Temperature as u8;
}

/// Pack a temperature response.
pub fn resp_pack(buf: &mut Frame, readings: &Readings, success: bool) {
    buf[0] = Tag::Temperature as u8;
    buf[IDX_FLAGS] = if success { FLAG_SUCCESS } else { 0x00 };
    for (ch, value) in readings.external.iter().enumerate() {
        pack_celsius(buf, IDX_SENSOR1 + 2 * ch, *value);
    }
    pack_celsius(buf, IDX_SELF, readings.controller);
    buf[IDX_FAN1_RPM..IDX_FAN1_RPM + 2].copy_from_slice(&readings.fan1_rpm.to_le_bytes());
    buf[IDX_RESV..FRAME_LEN].fill(0);
}

/// Unpack a temperature response. Reserved trailing bytes are ignored.
pub fn resp_unpack(buf: &Frame) -> (Readings, bool) {
    let mut readings = Readings::default();
    for ch in 0..NUM_EXTERNAL_SENSORS {
        readings.external[ch] = unpack_celsius(buf, IDX_SENSOR1 + 2 * ch);
    }
    readings.controller = unpack_celsius(buf, IDX_SELF);
    readings.fan1_rpm = u16::from_le_bytes([buf[IDX_FAN1_RPM], buf[IDX_FAN1_RPM + 1]]);
    let success = buf[IDX_FLAGS] & FLAG_SUCCESS != 0;
    (readings, success)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(readings: Readings) -> Readings {
        let mut buf: Frame = [0u8; FRAME_LEN];
        resp_pack(&mut buf, &readings, true);
        let (out, success) = resp_unpack(&buf);
        assert!(success);
        out
    }

    #[test]
    fn test_positive_temperatures_round_trip() {
        let readings = Readings {
            external: [21.5, 48.25, 0.0, 99.99],
            controller: 36.75,
            fan1_rpm: 2460,
        };
        let out = round_trip(readings);
        for ch in 0..NUM_EXTERNAL_SENSORS {
            assert!((out.external[ch] - readings.external[ch]).abs() < 0.01);
        }
        assert!((out.controller - readings.controller).abs() < 0.01);
        assert_eq!(out.fan1_rpm, 2460);
    }

    #[test]
    fn test_negative_temperatures_round_trip() {
        let readings = Readings {
            external: [-0.5, -12.34, -40.0, -273.15],
            controller: -5.25,
            fan1_rpm: 0,
        };
        let out = round_trip(readings);
        for ch in 0..NUM_EXTERNAL_SENSORS {
            assert!((out.external[ch] - readings.external[ch]).abs() < 0.01);
        }
        assert!((out.controller - readings.controller).abs() < 0.01);
    }

    #[test]
    fn test_negative_wire_encoding_is_complemented_magnitude() {
        // -1.00 degC: magnitude 100, then two's-complement negated.
        let readings = Readings {
            external: [-1.0, 0.0, 0.0, 0.0],
            ..Readings::default()
        };
        let mut buf: Frame = [0u8; FRAME_LEN];
        resp_pack(&mut buf, &readings, true);
        let raw = u16::from_le_bytes([buf[IDX_SENSOR1], buf[IDX_SENSOR1 + 1]]);
        assert_eq!(raw, (!100u16).wrapping_add(1));
    }

    #[test]
    fn test_request_is_zero_filled() {
        let mut buf: Frame = [0xAAu8; FRAME_LEN];
        req_pack(&mut buf);
        assert_eq!(buf[0], b'A');
        assert!(buf[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_failure_flag_propagates() {
        let mut buf: Frame = [0u8; FRAME_LEN];
        resp_pack(&mut buf, &Readings::default(), false);
        let (_, success) = resp_unpack(&buf);
        assert!(!success);
    }

    #[test]
    fn test_reserved_bytes_ignored() {
        let mut buf: Frame = [0u8; FRAME_LEN];
        resp_pack(&mut buf, &Readings::default(), true);
        buf[IDX_RESV] = 0xDE;
        buf[IDX_RESV + 1] = 0xAD;
        let (readings, success) = resp_unpack(&buf);
        assert!(success);
        assert_eq!(readings, Readings::default());
    }
}
