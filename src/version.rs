//! Controller build version message.
//!
//! The version string can exceed one frame's payload, so the response
//! is chunked: the first chunk carries the start-of-message flag and
//! the final chunk the end-of-message flag. The host re-requests until
//! it sees end-of-message and concatenates the chunks.
//!
//! # Layout
//!
//! ```text
//! +--------+----------------------------------------------+
//! | Offset | Description                                  |
//! +--------+----------------------------------------------+
//! | 0      | Tag (b'F')                                   |
//! | 1      | Flags: bit 0 = start-of-message,             |
//! |        | bit 1 = end-of-message (response only)       |
//! | 2..16  | ASCII chunk, NUL-padded                      |
//! +--------+----------------------------------------------+
//! ```

use crate::frame::{Frame, Tag, FRAME_LEN};

pub const IDX_FLAGS: usize = 1;
pub const IDX_DATA: usize = 2;

pub const FLAG_SOM: u8 = 1 << 0;
pub const FLAG_EOM: u8 = 1 << 1;

/// Payload bytes available per frame.
pub const CHUNK_LEN: usize = FRAME_LEN - IDX_DATA;

/// One decoded chunk of the version response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// First chunk of a (re)started string.
    pub som: bool,
    /// Final chunk; the string is complete.
    pub eom: bool,
    /// Chunk text, trailing NUL padding stripped.
    pub text: &'a [u8],
}

/// Pack a version read request.
pub fn req_pack(buf: &mut Frame) {
    buf.fill(0);
    buf[0] = Tag::Version as u8;
}

/// Pack one response chunk starting at `offset` into `version`.
///
/// Returns the offset the next chunk should start from; callers reset
/// to zero once the end-of-message chunk has been sent. The chunking
/// cursor is explicit state rather than a hidden static so a handler
/// can hold it alongside its other state.
pub fn resp_pack(buf: &mut Frame, version: &[u8], offset: usize) -> usize {
    buf.fill(0);
    buf[0] = Tag::Version as u8;

    let offset = offset.min(version.len());
    let take = (version.len() - offset).min(CHUNK_LEN);
    buf[IDX_DATA..IDX_DATA + take].copy_from_slice(&version[offset..offset + take]);

    if offset == 0 {
        buf[IDX_FLAGS] |= FLAG_SOM;
    }
    let next = offset + take;
    if next >= version.len() {
        buf[IDX_FLAGS] |= FLAG_EOM;
    }
    next
}

/// Unpack one response chunk. The text borrows from the frame.
pub fn resp_unpack(buf: &Frame) -> Chunk<'_> {
    let data = &buf[IDX_DATA..];
    let len = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    Chunk {
        som: buf[IDX_FLAGS] & FLAG_SOM != 0,
        eom: buf[IDX_FLAGS] & FLAG_EOM != 0,
        text: &data[..len],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_version_fits_one_chunk() {
        let mut buf: Frame = [0u8; FRAME_LEN];
        let next = resp_pack(&mut buf, b"v1.2.3", 0);
        assert_eq!(next, 6);
        let chunk = resp_unpack(&buf);
        assert!(chunk.som);
        assert!(chunk.eom);
        assert_eq!(chunk.text, b"v1.2.3");
    }

    #[test]
    fn test_long_version_spans_frames() {
        let version = b"v1.2.3-45-gdeadbeef-dirty";
        let mut buf: Frame = [0u8; FRAME_LEN];

        let mut assembled = Vec::new();
        let mut offset = 0;
        loop {
            offset = resp_pack(&mut buf, version, offset);
            let chunk = resp_unpack(&buf);
            if chunk.som {
                assembled.clear();
            }
            assembled.extend_from_slice(chunk.text);
            if chunk.eom {
                break;
            }
        }
        assert_eq!(assembled, version);
    }

    #[test]
    fn test_exact_chunk_boundary() {
        // A string of exactly CHUNK_LEN bytes must terminate on the
        // first frame, not emit an empty trailer.
        let version = [b'x'; CHUNK_LEN];
        let mut buf: Frame = [0u8; FRAME_LEN];
        let next = resp_pack(&mut buf, &version, 0);
        assert_eq!(next, CHUNK_LEN);
        let chunk = resp_unpack(&buf);
        assert!(chunk.som && chunk.eom);
        assert_eq!(chunk.text, &version);
    }

    #[test]
    fn test_empty_version() {
        let mut buf: Frame = [0u8; FRAME_LEN];
        let next = resp_pack(&mut buf, b"", 0);
        assert_eq!(next, 0);
        let chunk = resp_unpack(&buf);
        assert!(chunk.som && chunk.eom);
        assert!(chunk.text.is_empty());
    }
}
