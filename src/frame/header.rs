//! LZ4 frame header: magic, descriptor flags, block-size table, and the
//! single-byte header checksum.
//!
//! The frame layout follows the LZ4 frame format
//! (<https://github.com/lz4/lz4/blob/dev/doc/lz4_Frame_format.md>) restricted
//! to the descriptor this tool emits: version 1, optional block
//! independence, optional content checksum, no content size, no dictionary
//! ID, no per-block checksums.  The header is therefore always exactly
//! 7 bytes: magic, flags, block-max byte, checksum byte.

use crate::error::CodecError;
use crate::xxhash::xxh32_oneshot;

/// Frame magic number, serialised little-endian as `04 22 4D 18`.
pub const FRAME_MAGIC: u32 = 0x184D_2204;

/// Flags byte: version bits (01 in bits 7-6).
pub const FLAG_VERSION: u8 = 0x40;
/// Flags byte: blocks are independent (no inter-block history).
pub const FLAG_BLOCK_INDEPENDENT: u8 = 0x20;
/// Flags byte: a 4-byte XXH32 content checksum follows the end mark.
pub const FLAG_CONTENT_CHECKSUM: u8 = 0x04;

/// Block header high bit: the payload is stored uncompressed.
pub const BLOCK_UNCOMPRESSED: u32 = 0x8000_0000;

/// Fixed frame header length in bytes.
pub const FRAME_HEADER_SIZE: usize = 7;

/// Raw block mode footer: two zero bytes.
pub const RAW_FOOTER: [u8; 2] = [0, 0];

/// Default block-max code (4 MiB blocks).
pub const DEFAULT_BLOCK_MAX_CODE: u8 = 7;

/// Maximum bytes a block may hold for a given code in `4..=7`.
#[inline]
pub fn block_max_size(code: u8) -> usize {
    debug_assert!((4..=7).contains(&code));
    (64 << 10) << (2 * (code - 4) as usize)
}

/// Single-byte header checksum: second byte of the XXH32 of the descriptor
/// bytes (flags and block-max), seed 0.
#[inline]
pub fn header_checksum(descriptor: &[u8]) -> u8 {
    ((xxh32_oneshot(descriptor, 0) >> 8) & 0xFF) as u8
}

/// The frame parameters carried in the 7-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Block-max code, 4..=7 (64 KiB to 4 MiB).
    pub block_max_code: u8,
    /// Blocks do not reference earlier blocks.
    pub independent: bool,
    /// A content checksum trails the frame.
    pub content_checksum: bool,
}

impl FrameDescriptor {
    /// Serialise the 7-byte frame header.
    pub fn to_bytes(self) -> [u8; FRAME_HEADER_SIZE] {
        let mut flags = FLAG_VERSION;
        if self.independent {
            flags |= FLAG_BLOCK_INDEPENDENT;
        }
        if self.content_checksum {
            flags |= FLAG_CONTENT_CHECKSUM;
        }
        let bd = self.block_max_code << 4;
        let mut header = [0u8; FRAME_HEADER_SIZE];
        header[..4].copy_from_slice(&FRAME_MAGIC.to_le_bytes());
        header[4] = flags;
        header[5] = bd;
        header[6] = header_checksum(&header[4..6]);
        header
    }

    /// Parse and validate a 7-byte frame header.
    pub fn parse(header: &[u8; FRAME_HEADER_SIZE]) -> Result<Self, CodecError> {
        let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if magic != FRAME_MAGIC {
            return Err(CodecError::Format("bad magic number"));
        }
        let flags = header[4];
        if flags & 0xC0 != FLAG_VERSION {
            return Err(CodecError::Format("unsupported frame version"));
        }
        if flags & !(FLAG_VERSION | FLAG_BLOCK_INDEPENDENT | FLAG_CONTENT_CHECKSUM) != 0 {
            return Err(CodecError::Format("unsupported descriptor flags"));
        }
        let bd = header[5];
        if bd & 0x0F != 0 {
            return Err(CodecError::Format("reserved block-descriptor bits set"));
        }
        let block_max_code = bd >> 4;
        if !(4..=7).contains(&block_max_code) {
            return Err(CodecError::Format("invalid block maximum size"));
        }
        if header_checksum(&header[4..6]) != header[6] {
            return Err(CodecError::Checksum("frame header"));
        }
        Ok(FrameDescriptor {
            block_max_code,
            independent: flags & FLAG_BLOCK_INDEPENDENT != 0,
            content_checksum: flags & FLAG_CONTENT_CHECKSUM != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_sizes() {
        assert_eq!(block_max_size(4), 64 * 1024);
        assert_eq!(block_max_size(5), 256 * 1024);
        assert_eq!(block_max_size(6), 1024 * 1024);
        assert_eq!(block_max_size(7), 4 * 1024 * 1024);
    }

    #[test]
    fn default_descriptor_bytes() {
        let d = FrameDescriptor {
            block_max_code: 7,
            independent: false,
            content_checksum: false,
        };
        assert_eq!(
            d.to_bytes(),
            [0x04, 0x22, 0x4D, 0x18, 0x40, 0x70, 0xC0]
        );
    }

    #[test]
    fn descriptors_roundtrip() {
        for code in 4..=7u8 {
            for independent in [false, true] {
                for content_checksum in [false, true] {
                    let d = FrameDescriptor {
                        block_max_code: code,
                        independent,
                        content_checksum,
                    };
                    assert_eq!(FrameDescriptor::parse(&d.to_bytes()).unwrap(), d);
                }
            }
        }
    }

    #[test]
    fn bad_headers_rejected() {
        let good = FrameDescriptor {
            block_max_code: 7,
            independent: false,
            content_checksum: false,
        }
        .to_bytes();

        let mut bad = good;
        bad[0] = 0x05;
        assert!(matches!(
            FrameDescriptor::parse(&bad),
            Err(CodecError::Format(_))
        ));

        // Version bits 10 instead of 01.
        let mut bad = good;
        bad[4] = 0x80;
        assert!(matches!(
            FrameDescriptor::parse(&bad),
            Err(CodecError::Format(_))
        ));

        // Reserved flag (content size announced).
        let mut bad = good;
        bad[4] |= 0x08;
        assert!(matches!(
            FrameDescriptor::parse(&bad),
            Err(CodecError::Format(_))
        ));

        // Block-max code outside 4..=7.
        let mut bad = good;
        bad[5] = 0x30;
        assert!(matches!(
            FrameDescriptor::parse(&bad),
            Err(CodecError::Format(_))
        ));

        // Flipped checksum byte.
        let mut bad = good;
        bad[6] ^= 0xFF;
        assert!(matches!(
            FrameDescriptor::parse(&bad),
            Err(CodecError::Checksum(_))
        ));
    }
}
