//! Frame-format and raw-block decompression paths.
//!
//! The framed path validates the 7-byte header (magic, version, descriptor
//! flags, checksum byte), then processes blocks until the zero end mark,
//! maintaining the same rolling history the compressor used so dependent
//! blocks resolve their back-references.  When the header announces a
//! content checksum the decoded stream's XXH32 is verified against the
//! trailing 4 bytes.
//!
//! Blocks must be delivered strictly in order: a dependent block references
//! bytes of its predecessor through the history window.

use crate::block::decode::DecodeError;
use crate::block::decode_block;
use crate::block::types::MAX_OFFSET;
use crate::error::CodecError;
use crate::io::stream::{InStream, OutStream};
use crate::xxhash::Xxh32State;

use super::compress::history_tail;
use super::header::{
    block_max_size, FrameDescriptor, BLOCK_UNCOMPRESSED, FRAME_HEADER_SIZE,
};

/// Statistics from one decompression run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecompressStats {
    /// Compressed bytes consumed, framing included.
    pub bytes_in: u64,
    /// Decoded bytes produced.
    pub bytes_out: u64,
}

fn decode_error(e: DecodeError) -> CodecError {
    match e {
        DecodeError::BadOffset => CodecError::Corrupt("match offset outside window"),
        DecodeError::Truncated => CodecError::Corrupt("truncated sequence"),
        DecodeError::Oversize => CodecError::Corrupt("block expands past its maximum"),
    }
}

/// Decompress a framed LZ4 stream from `src` into `dst`.
pub fn decompress_frame(
    src: &mut dyn InStream,
    dst: &mut dyn OutStream,
    dict: &[u8],
    progress: &mut dyn FnMut(u64, u64),
) -> Result<DecompressStats, CodecError> {
    let mut header = [0u8; FRAME_HEADER_SIZE];
    if src.read_fully(&mut header)? != FRAME_HEADER_SIZE {
        return Err(CodecError::Format("truncated frame header"));
    }
    let desc = FrameDescriptor::parse(&header)?;
    let block_max = block_max_size(desc.block_max_code);

    let dict = history_tail(dict);
    let mut history = dict.to_vec();
    let mut payload_buf = vec![0u8; block_max];
    let mut window = vec![0u8; MAX_OFFSET + block_max];
    let mut hasher = desc.content_checksum.then(|| Xxh32State::new(0));

    let mut stats = DecompressStats {
        bytes_in: FRAME_HEADER_SIZE as u64,
        bytes_out: 0,
    };

    loop {
        let mut bh = [0u8; 4];
        if src.read_fully(&mut bh)? != 4 {
            return Err(CodecError::Corrupt("truncated block header"));
        }
        stats.bytes_in += 4;
        let word = u32::from_le_bytes(bh);
        if word == 0 {
            break;
        }
        let stored = word & BLOCK_UNCOMPRESSED != 0;
        let size = (word & !BLOCK_UNCOMPRESSED) as usize;
        if size > block_max {
            return Err(CodecError::Corrupt("block larger than frame maximum"));
        }
        if src.read_fully(&mut payload_buf[..size])? != size {
            return Err(CodecError::Corrupt("truncated block"));
        }
        stats.bytes_in += size as u64;

        let h = history.len();
        window[..h].copy_from_slice(&history);
        let decoded_len = if stored {
            window[h..h + size].copy_from_slice(&payload_buf[..size]);
            size
        } else {
            decode_block(&payload_buf[..size], &mut window[..h + block_max], h)
                .map_err(decode_error)?
        };

        let decoded_end = h + decoded_len;
        if let Some(hs) = hasher.as_mut() {
            hs.update(&window[h..decoded_end]);
        }
        dst.write(&window[h..decoded_end])?;
        stats.bytes_out += decoded_len as u64;
        progress(stats.bytes_in, stats.bytes_out);

        if desc.independent {
            history.clear();
            history.extend_from_slice(dict);
        } else {
            history.clear();
            history.extend_from_slice(history_tail(&window[..decoded_end]));
        }
    }

    if let Some(hs) = hasher {
        let mut tail = [0u8; 4];
        if src.read_fully(&mut tail)? != 4 {
            return Err(CodecError::Corrupt("truncated content checksum"));
        }
        stats.bytes_in += 4;
        if u32::from_le_bytes(tail) != hs.digest() {
            return Err(CodecError::Checksum("content"));
        }
    }
    Ok(stats)
}

/// Decompress a raw block stream: a single block payload terminated by the
/// two-byte zero footer, with no frame or block headers.
pub fn decompress_raw_block(
    src: &mut dyn InStream,
    dst: &mut dyn OutStream,
    dict: &[u8],
    progress: &mut dyn FnMut(u64, u64),
) -> Result<DecompressStats, CodecError> {
    let mut data = Vec::new();
    let mut chunk = [0u8; 16 * 1024];
    loop {
        let n = src.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);
    }
    if data.len() < 2 || data[data.len() - 2..] != [0, 0] {
        return Err(CodecError::Format("missing raw block footer"));
    }
    let payload = &data[..data.len() - 2];

    let dict = history_tail(dict);
    let h = dict.len();
    let mut window = vec![0u8; h + MAX_OFFSET];
    window[..h].copy_from_slice(dict);
    let decoded_len = decode_block(payload, &mut window, h).map_err(decode_error)?;

    dst.write(&window[h..h + decoded_len])?;
    let stats = DecompressStats {
        bytes_in: data.len() as u64,
        bytes_out: decoded_len as u64,
    };
    progress(stats.bytes_in, stats.bytes_out);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::compress::{compress_frame, compress_raw_block};

    fn roundtrip(data: &[u8], desc: FrameDescriptor, dict: &[u8]) -> Vec<u8> {
        let mut framed = Vec::new();
        compress_frame(&mut &data[..], &mut framed, desc, dict, &mut |_, _| {}).unwrap();
        let mut decoded = Vec::new();
        decompress_frame(&mut framed.as_slice(), &mut decoded, dict, &mut |_, _| {})
            .unwrap();
        decoded
    }

    fn default_desc() -> FrameDescriptor {
        FrameDescriptor {
            block_max_code: 7,
            independent: false,
            content_checksum: false,
        }
    }

    #[test]
    fn empty_frame_roundtrips() {
        assert_eq!(roundtrip(b"", default_desc(), b""), b"");
    }

    #[test]
    fn text_roundtrips_all_block_codes() {
        let data = b"round and round and round the ragged rock the rascal ran".repeat(41);
        for code in 4..=7u8 {
            for independent in [false, true] {
                let desc = FrameDescriptor {
                    block_max_code: code,
                    independent,
                    content_checksum: false,
                };
                assert_eq!(roundtrip(&data, desc, b""), data);
            }
        }
    }

    #[test]
    fn multi_block_dependent_stream() {
        // Repetition with a period longer than one 64 KiB block forces
        // cross-block references in dependent mode.
        let phrase: Vec<u8> = (0..48 * 1024u32).map(|i| (i % 251) as u8).collect();
        let data = phrase.repeat(4);
        let desc = FrameDescriptor {
            block_max_code: 4,
            independent: false,
            content_checksum: false,
        };
        let mut framed = Vec::new();
        compress_frame(&mut data.as_slice(), &mut framed, desc, b"", &mut |_, _| {})
            .unwrap();
        assert!(framed.len() < data.len() / 4);
        let mut decoded = Vec::new();
        decompress_frame(&mut framed.as_slice(), &mut decoded, b"", &mut |_, _| {})
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn content_checksum_verified() {
        let desc = FrameDescriptor {
            content_checksum: true,
            ..default_desc()
        };
        let data = b"guarded by a trailing hash".repeat(9);
        let mut framed = Vec::new();
        compress_frame(&mut &data[..], &mut framed, desc, b"", &mut |_, _| {}).unwrap();

        let mut decoded = Vec::new();
        decompress_frame(&mut framed.as_slice(), &mut decoded, b"", &mut |_, _| {})
            .unwrap();
        assert_eq!(decoded, data);

        // Flip one checksum byte.
        let len = framed.len();
        framed[len - 1] ^= 0x01;
        let mut decoded = Vec::new();
        assert!(matches!(
            decompress_frame(&mut framed.as_slice(), &mut decoded, b"", &mut |_, _| {}),
            Err(CodecError::Checksum("content"))
        ));
    }

    #[test]
    fn corrupt_payload_is_rejected() {
        let data = b"abcdabcdabcdabcdabcdabcdabcdabcd";
        let mut framed = Vec::new();
        compress_frame(&mut &data[..], &mut framed, default_desc(), b"", &mut |_, _| {})
            .unwrap();
        // Corrupt the first match offset: frame header (7) + block header
        // (4) + token (1) + four literals puts it at bytes 16-17.
        framed[16] = 0xFF;
        framed[17] = 0xFF;
        let mut decoded = Vec::new();
        assert!(matches!(
            decompress_frame(&mut framed.as_slice(), &mut decoded, b"", &mut |_, _| {}),
            Err(CodecError::Corrupt(_))
        ));
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let data = b"truncate me, truncate me, truncate me";
        let mut framed = Vec::new();
        compress_frame(&mut &data[..], &mut framed, default_desc(), b"", &mut |_, _| {})
            .unwrap();
        framed.truncate(framed.len() - 6);
        let mut decoded = Vec::new();
        assert!(decompress_frame(
            &mut framed.as_slice(),
            &mut decoded,
            b"",
            &mut |_, _| {}
        )
        .is_err());
    }

    #[test]
    fn raw_block_roundtrips() {
        let data = vec![7u8; 4096];
        let mut raw = Vec::new();
        compress_raw_block(&mut data.as_slice(), &mut raw, b"", &mut |_, _| {}).unwrap();
        let mut decoded = Vec::new();
        decompress_raw_block(&mut raw.as_slice(), &mut decoded, b"", &mut |_, _| {})
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn raw_block_requires_footer() {
        let mut decoded = Vec::new();
        assert!(matches!(
            decompress_raw_block(&mut &b"\x10a"[..], &mut decoded, b"", &mut |_, _| {}),
            Err(CodecError::Format(_))
        ));
    }
}
