//! Frame-format and raw-block compression paths.
//!
//! The framed path chunks the input into blocks of at most the descriptor's
//! block-max size, runs the optimal parse over each block (with the history
//! prefix prepended to the match window), and emits either the compressed
//! payload or — when the parse cannot beat the source bytes — the block
//! stored verbatim with the uncompressed bit set in its header.
//!
//! In dependent mode the match window is seeded with the last 65535 bytes of
//! everything processed so far (dictionary included); independent mode
//! resets the window to the dictionary tail for every block.  The
//! decompressor applies the identical rule, so offsets always resolve.

use crate::block::types::MAX_OFFSET;
use crate::block::encode_block;
use crate::error::CodecError;
use crate::io::stream::{InStream, OutStream};
use crate::opt::optimal_parse;
use crate::xxhash::Xxh32State;

use super::header::{block_max_size, FrameDescriptor, BLOCK_UNCOMPRESSED, RAW_FOOTER};

/// Statistics from one compression run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompressStats {
    /// Uncompressed source bytes consumed.
    pub bytes_in: u64,
    /// Bytes written, framing included.
    pub bytes_out: u64,
    /// Tokens in the emitted stream (stored-verbatim blocks carry none).
    pub tokens: u64,
}

/// The usable dictionary suffix: match offsets cannot reach further back
/// than 65535 bytes, so only that much history matters.
#[inline]
pub(crate) fn history_tail(data: &[u8]) -> &[u8] {
    &data[data.len().saturating_sub(MAX_OFFSET)..]
}

/// Append `block` to the rolling history, keeping at most 65535 bytes.
fn roll_history(history: &mut Vec<u8>, block: &[u8]) {
    history.extend_from_slice(block);
    if history.len() > MAX_OFFSET {
        let excess = history.len() - MAX_OFFSET;
        history.drain(..excess);
    }
}

/// Parse and encode one block against `history`.  Returns the compressed
/// payload (`None` when storing verbatim is at least as small) and the
/// token count of the parse.
fn shrink_block(history: &[u8], block: &[u8]) -> (Option<Vec<u8>>, u64) {
    let mut window = Vec::with_capacity(history.len() + block.len());
    window.extend_from_slice(history);
    window.extend_from_slice(block);
    let parse = optimal_parse(&window, history.len());
    (encode_block(block, &parse.commands), parse.tokens)
}

/// Compress `src` into a framed LZ4 stream on `dst`.
///
/// `progress` is invoked after every block with the running totals
/// `(bytes_in, bytes_out)`.
pub fn compress_frame(
    src: &mut dyn InStream,
    dst: &mut dyn OutStream,
    desc: FrameDescriptor,
    dict: &[u8],
    progress: &mut dyn FnMut(u64, u64),
) -> Result<CompressStats, CodecError> {
    let block_max = block_max_size(desc.block_max_code);
    let mut stats = CompressStats::default();

    let header = desc.to_bytes();
    dst.write(&header)?;
    stats.bytes_out += header.len() as u64;

    let dict = history_tail(dict);
    let mut history = dict.to_vec();
    let mut block_buf = vec![0u8; block_max];
    let mut hasher = desc.content_checksum.then(|| Xxh32State::new(0));

    loop {
        let n = src.read_fully(&mut block_buf)?;
        if n == 0 {
            break;
        }
        let block = &block_buf[..n];
        if let Some(h) = hasher.as_mut() {
            h.update(block);
        }

        let (payload, tokens) = shrink_block(&history, block);
        match payload {
            Some(payload) => {
                dst.write(&(payload.len() as u32).to_le_bytes())?;
                dst.write(&payload)?;
                stats.bytes_out += 4 + payload.len() as u64;
                stats.tokens += tokens;
            }
            None => {
                dst.write(&(n as u32 | BLOCK_UNCOMPRESSED).to_le_bytes())?;
                dst.write(block)?;
                stats.bytes_out += 4 + n as u64;
            }
        }
        stats.bytes_in += n as u64;
        progress(stats.bytes_in, stats.bytes_out);

        if desc.independent {
            history.clear();
            history.extend_from_slice(dict);
        } else {
            roll_history(&mut history, block);
        }
    }

    // End mark, then the optional content checksum.
    dst.write(&0u32.to_le_bytes())?;
    stats.bytes_out += 4;
    if let Some(h) = hasher {
        dst.write(&h.digest().to_le_bytes())?;
        stats.bytes_out += 4;
    }
    Ok(stats)
}

/// Compress `src` as a single raw block: no frame header, no block header,
/// a two-byte zero footer.  The input must fit one 64 KiB-window block and
/// must actually compress — raw mode has no stored-block escape.
pub fn compress_raw_block(
    src: &mut dyn InStream,
    dst: &mut dyn OutStream,
    dict: &[u8],
    progress: &mut dyn FnMut(u64, u64),
) -> Result<CompressStats, CodecError> {
    // One byte of headroom makes an oversized input detectable.
    let mut buf = vec![0u8; MAX_OFFSET + 1];
    let n = src.read_fully(&mut buf)?;
    if n > MAX_OFFSET {
        return Err(CodecError::RawTooLarge { size: n as u64 });
    }
    let block = &buf[..n];

    let (payload, tokens) = shrink_block(history_tail(dict), block);
    let payload = payload.ok_or(CodecError::RawUncompressible)?;

    dst.write(&payload)?;
    dst.write(&RAW_FOOTER)?;
    let stats = CompressStats {
        bytes_in: n as u64,
        bytes_out: (payload.len() + RAW_FOOTER.len()) as u64,
        tokens,
    };
    progress(stats.bytes_in, stats.bytes_out);
    Ok(stats)
}
