//! Frame layout and the message-type registry.

/// Every frame on the wire is exactly this long.
pub const FRAME_LEN: usize = 16;

/// Byte offset of the tag within a frame.
pub const IDX_TAG: usize = 0;

/// A raw link frame.
///
/// Frames are plain byte arrays rather than a wrapper type: handlers
/// and clients index into them via the per-message offset constants,
/// and ownership transfers wholesale when a frame is queued.
pub type Frame = [u8; FRAME_LEN];

/// Message tags.
///
/// One ASCII byte per message type, acting as both the message
/// discriminator and the synchronization marker. The set is fixed by
/// the board protocol; both ends of the link compile against this
/// same table.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Board temperatures and fan tachometer readout.
    Temperature = b'A',
    /// Fan PWM duty read/write.
    FanPwm = b'B',
    /// Watchdog timer configuration.
    Watchdog = b'C',
    /// Graceful-shutdown notification (controller to host) and its
    /// acknowledgement (host to controller).
    Shutdown = b'D',
    /// Link echo test.
    Ping = b'E',
    /// Controller build version string, possibly spanning frames.
    Version = b'F',
}

impl Tag {
    /// All registered tags.
    pub const ALL: [Tag; 6] = [
        Tag::Temperature,
        Tag::FanPwm,
        Tag::Watchdog,
        Tag::Shutdown,
        Tag::Ping,
        Tag::Version,
    ];

    /// Tags the host requests and therefore queues responses for.
    ///
    /// `Shutdown` is absent: the host never waits for a shutdown
    /// frame, it only receives one unsolicited.
    pub const SOLICITED: [Tag; 5] = [
        Tag::Temperature,
        Tag::FanPwm,
        Tag::Watchdog,
        Tag::Ping,
        Tag::Version,
    ];

    /// Look a byte up in the registry.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Tag::Temperature),
            b'B' => Some(Tag::FanPwm),
            b'C' => Some(Tag::Watchdog),
            b'D' => Some(Tag::Shutdown),
            b'E' => Some(Tag::Ping),
            b'F' => Some(Tag::Version),
            _ => None,
        }
    }
}

/// Read the tag byte of a frame, if it is registered.
pub fn tag_of(frame: &Frame) -> Option<Tag> {
    Tag::from_byte(frame[IDX_TAG])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_distinct() {
        for (i, a) in Tag::ALL.iter().enumerate() {
            for b in &Tag::ALL[i + 1..] {
                assert_ne!(*a as u8, *b as u8);
            }
        }
    }

    #[test]
    fn test_from_byte_round_trip() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_byte(tag as u8), Some(tag));
        }
    }

    #[test]
    fn test_unregistered_bytes_rejected() {
        assert_eq!(Tag::from_byte(0x00), None);
        assert_eq!(Tag::from_byte(b'G'), None);
        assert_eq!(Tag::from_byte(0xFF), None);
    }

    #[test]
    fn test_tag_of() {
        let mut frame: Frame = [0u8; FRAME_LEN];
        frame[IDX_TAG] = b'E';
        assert_eq!(tag_of(&frame), Some(Tag::Ping));
        frame[IDX_TAG] = 0x7F;
        assert_eq!(tag_of(&frame), None);
    }
}
