//! Receive-side frame assembly.

use boardlink::{Frame, FRAME_LEN};
use heapless::Vec;

/// Accumulates UART bytes into 16-byte frames.
///
/// Called from the receive interrupt, one byte at a time. Zero bytes
/// arriving while the buffer is empty are line noise from the host
/// UART powering up and are dropped; zero is not a registered tag, so
/// this can never eat the start of a real frame.
pub struct FrameAssembler {
    buf: Vec<u8, FRAME_LEN>,
}

impl FrameAssembler {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed one byte; returns a frame once 16 bytes have accumulated.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        if self.buf.is_empty() && byte == 0 {
            return None;
        }
        // Cannot fail: the buffer is drained the moment it fills.
        let _ = self.buf.push(byte);
        if self.buf.is_full() {
            let mut frame: Frame = [0u8; FRAME_LEN];
            frame.copy_from_slice(&self.buf);
            self.buf.clear();
            Some(frame)
        } else {
            None
        }
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembles_after_sixteen_bytes() {
        let mut asm = FrameAssembler::new();
        for i in 1..FRAME_LEN as u8 {
            assert!(asm.push(i).is_none());
        }
        let frame = asm.push(16).unwrap();
        assert_eq!(frame[0], 1);
        assert_eq!(frame[15], 16);
    }

    #[test]
    fn test_leading_zeros_dropped() {
        let mut asm = FrameAssembler::new();
        for _ in 0..5 {
            assert!(asm.push(0).is_none());
        }
        assert!(asm.push(b'E').is_none());
        for _ in 0..FRAME_LEN - 2 {
            assert!(asm.push(0x11).is_none());
        }
        // The five zeros did not count towards the frame.
        let frame = asm.push(0x22).unwrap();
        assert_eq!(frame[0], b'E');
        assert_eq!(frame[15], 0x22);
    }

    #[test]
    fn test_interior_zeros_kept() {
        let mut asm = FrameAssembler::new();
        asm.push(b'A');
        for _ in 0..FRAME_LEN - 2 {
            asm.push(0);
        }
        let frame = asm.push(0).unwrap();
        assert_eq!(frame[0], b'A');
        assert!(frame[1..].iter().all(|&b| b == 0));
    }
}
