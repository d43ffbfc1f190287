//! LZ4 block encoder: serialises a parsed command stream into block bytes.
//!
//! Each emitted sequence is a token byte (literal-run nibble, match-length
//! nibble), optional 0xFF run-extension bytes, the literal bytes, and — for
//! all but the trailing sequence — a 16-bit little-endian offset plus
//! optional match-length extension bytes.  The block always terminates with
//! a literal-only token (possibly with a zero-length run) so the decoder can
//! recognise the end of the block by input exhaustion.

use super::types::{push_le16, Command, MIN_MATCH, ML_MASK, RUN_MASK};

/// Append the 0xFF extension chain for a run value `n` that exceeded its
/// token nibble (`n >= 15`): 0xFF per full 255-step, then the remainder.
fn push_run_extension(out: &mut Vec<u8>, n: usize) {
    let mut remaining = n - RUN_MASK;
    while remaining >= 255 {
        out.push(255);
        remaining -= 255;
    }
    out.push(remaining as u8);
}

/// Append one sequence: `literals`, then `mat` if this is not the trailing
/// literal-only sequence.
fn push_sequence(out: &mut Vec<u8>, literals: &[u8], mat: Option<(u16, usize)>) {
    let lit_len = literals.len();
    let ml_nibble = match mat {
        Some((_, len)) => {
            debug_assert!(len >= MIN_MATCH);
            (len - MIN_MATCH).min(ML_MASK)
        }
        None => 0,
    };
    out.push(((lit_len.min(RUN_MASK) << 4) | ml_nibble) as u8);
    if lit_len >= RUN_MASK {
        push_run_extension(out, lit_len);
    }
    out.extend_from_slice(literals);
    if let Some((offset, len)) = mat {
        debug_assert!(offset > 0);
        push_le16(out, offset);
        if len - MIN_MATCH >= ML_MASK {
            push_run_extension(out, len - MIN_MATCH);
        }
    }
}

/// Encode `block` according to `commands`.
///
/// Returns `None` when the encoded stream does not come out strictly smaller
/// than the source — the caller then stores the block uncompressed (framed
/// mode) or fails (raw mode).  The check is applied as soon as the running
/// output reaches the source length, so incompressible blocks bail out
/// early.
///
/// The command stream must consume `block` exactly; a shortfall or overrun
/// is an internal-invariant violation reported by the parser's tests, and is
/// guarded here with debug assertions only.
pub fn encode_block(block: &[u8], commands: &[Command]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(block.len());
    let mut pos = 0usize;
    let mut lit_start = 0usize;

    for cmd in commands {
        match *cmd {
            Command::Literals { len } => {
                pos += len;
            }
            Command::Match { offset, len } => {
                push_sequence(&mut out, &block[lit_start..pos], Some((offset, len)));
                pos += len;
                lit_start = pos;
                if out.len() >= block.len() {
                    return None;
                }
            }
        }
    }
    debug_assert_eq!(pos, block.len(), "command stream must cover the block");

    // Trailing literal-only token.
    push_sequence(&mut out, &block[lit_start..pos], None);
    if out.len() >= block.len() {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_then_match() {
        // "a" + match(offset 1, len 7) covering "aaaaaaaa".
        let block = b"aaaaaaaa";
        let commands = [
            Command::Literals { len: 1 },
            Command::Match { offset: 1, len: 7 },
        ];
        let out = encode_block(block, &commands).unwrap();
        // token (1 lit, ml 7-4=3), 'a', offset LE16, trailing empty token.
        assert_eq!(out, [0x13, b'a', 0x01, 0x00, 0x00]);
    }

    #[test]
    fn long_literal_run_uses_extension() {
        // 20 distinct literals then a 100-byte match: both run fields overflow
        // their nibbles.
        let mut block: Vec<u8> = (0..20u8).collect();
        block.extend(std::iter::repeat(b'x').take(100));
        let commands = [
            Command::Literals { len: 21 },
            Command::Match { offset: 1, len: 99 },
        ];
        let out = encode_block(&block, &commands).unwrap();
        // literal run 21 = 15 + 6; match value 99-4 = 95 = 15 + 80.
        assert_eq!(out[0], 0xFF);
        assert_eq!(out[1], 6);
        assert_eq!(&out[2..23], &block[..21]);
        assert_eq!(&out[23..25], &[0x01, 0x00]);
        assert_eq!(out[25], 80);
        assert_eq!(*out.last().unwrap(), 0x00);
    }

    #[test]
    fn long_match_extension_bytes() {
        // 4 literals then a 300-byte match: ml value 300-4 = 296 = 15 + 255 + 26.
        let block: Vec<u8> = [1u8, 2, 3, 4].repeat(76);
        let commands = [
            Command::Literals { len: 4 },
            Command::Match { offset: 4, len: 300 },
        ];
        let out = encode_block(&block, &commands).unwrap();
        assert_eq!(out[0], (4 << 4) as u8 | 0x0F);
        assert_eq!(&out[1..5], &block[..4]);
        assert_eq!(&out[5..7], &[0x04, 0x00]);
        assert_eq!(&out[7..9], &[255, 26]);
        // trailing empty literal token
        assert_eq!(*out.last().unwrap(), 0x00);
    }

    #[test]
    fn incompressible_block_is_rejected() {
        let block = [1u8, 2, 3, 4];
        let commands = [Command::Literals { len: 4 }];
        // token + 4 literals + nothing = 5 bytes >= 4.
        assert!(encode_block(&block, &commands).is_none());
    }
}
