//! Minimum-size parse of a block under the LZ4 token encoding.
//!
//! Right-to-left dynamic programming over two edge kinds: a literal edge
//! `p → p+1`, and match edges `p → p+k` for truncations `k` of the dominant
//! candidate at `p`.  The cost of a position is the exact number of output
//! bytes for the block suffix starting there, given that the position opens
//! a fresh sequence.
//!
//! Literal-run overhead is amortised through a parallel array holding the
//! length of the literal run that the optimal suffix parse opens with: one
//! more literal costs `1` plus the run-extension increment, and the token
//! byte that closes a run is charged by the match (or trailing token) that
//! owns it.
//!
//! Match lengths are enumerated where the cost function actually moves:
//! every length in `4..=18` (nibble tier), the first extension tier
//! boundary 273, and the full candidate length.  Longer truncations inside
//! a flat tier cannot beat the enumerated ones on real parses, and the
//! bound keeps the table linear in the block size.

use crate::block::types::{extra_run_bytes, Command, MAX_MATCH, MIN_MATCH};

use super::search::MatchFinder;

/// Result of parsing one block.
#[derive(Debug)]
pub struct Parse {
    /// Cursor-relative commands covering the block exactly.
    pub commands: Vec<Command>,
    /// Number of tokens the encoder will emit (matches plus the trailing
    /// literal-only token).
    pub tokens: u64,
    /// Exact encoded payload size in bytes.
    pub encoded_size: usize,
}

/// Candidate match lengths worth relaxing for a dominant candidate of
/// length `kmax`: the nibble tier, the first extension boundary, and the
/// full length.
#[inline]
fn enumerate_lengths(kmax: usize, mut relax: impl FnMut(usize)) {
    let nibble_top = kmax.min(18);
    for k in MIN_MATCH..=nibble_top {
        relax(k);
    }
    if kmax > 273 {
        relax(273);
    }
    if kmax > 18 {
        relax(kmax);
    }
}

/// Compute the optimal parse of `window[block_start..]`.
///
/// `window` is the history prefix (dictionary tail or previous-block tail)
/// followed by the block; matches may reach into the prefix but commands
/// are emitted relative to the block itself.
pub fn optimal_parse(window: &[u8], block_start: usize) -> Parse {
    let block_len = window.len() - block_start;
    if block_len == 0 {
        return Parse {
            commands: Vec::new(),
            tokens: 1,
            encoded_size: 1,
        };
    }

    let finder = MatchFinder::new(window);

    // Arrivals: cost, opening literal-run length, and the match choice
    // (length 0 = literal) per block position.
    let mut cost = vec![u32::MAX; block_len + 1];
    let mut run = vec![0u32; block_len + 1];
    let mut match_len = vec![0u32; block_len + 1];
    let mut match_off = vec![0u16; block_len + 1];

    // The block always terminates with a literal-only token.
    cost[block_len] = 1;

    for p in (0..block_len).rev() {
        // Literal edge: extend the run the suffix at p+1 opens with.
        let r = run[p + 1] as usize;
        let lit_cost =
            cost[p + 1] + 1 + (extra_run_bytes(r + 1) - extra_run_bytes(r)) as u32;
        cost[p] = lit_cost;
        run[p] = (r + 1) as u32;
        match_len[p] = 0;

        // Match edges from the dominant candidate, truncated where the cost
        // tiers change.
        let cap = block_len - p;
        if let Some(c) = finder.best_match(block_start + p, cap.min(MAX_MATCH)) {
            enumerate_lengths(c.length as usize, |k| {
                let edge = 3 + extra_run_bytes(k - MIN_MATCH) as u32;
                let total = cost[p + k] + edge;
                let better = total < cost[p]
                    || (total == cost[p] && k as u32 > match_len[p]);
                if better {
                    cost[p] = total;
                    run[p] = 0;
                    match_len[p] = k as u32;
                    match_off[p] = c.offset as u16;
                }
            });
        }
    }

    // Forward walk over the chosen arrivals.
    let mut commands = Vec::new();
    let mut tokens = 1u64; // trailing literal-only token
    let mut p = 0usize;
    while p < block_len {
        if match_len[p] > 0 {
            commands.push(Command::Match {
                offset: match_off[p],
                len: match_len[p] as usize,
            });
            tokens += 1;
            p += match_len[p] as usize;
        } else {
            let r = run[p] as usize;
            commands.push(Command::Literals { len: r });
            p += r;
        }
    }

    Parse {
        commands,
        tokens,
        encoded_size: cost[0] as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::encode_block;

    fn parse_block(block: &[u8]) -> Parse {
        optimal_parse(block, 0)
    }

    /// The commands must consume the block exactly (token conservation).
    fn covered(parse: &Parse) -> usize {
        parse
            .commands
            .iter()
            .map(|c| match *c {
                Command::Literals { len } => len,
                Command::Match { len, .. } => len,
            })
            .sum()
    }

    #[test]
    fn empty_block() {
        let p = parse_block(b"");
        assert!(p.commands.is_empty());
        assert_eq!(p.tokens, 1);
        assert_eq!(p.encoded_size, 1);
    }

    #[test]
    fn short_run_parses_as_one_literal_and_a_match() {
        let p = parse_block(b"aaaaaaaa");
        assert_eq!(
            p.commands,
            vec![
                Command::Literals { len: 1 },
                Command::Match { offset: 1, len: 7 },
            ]
        );
        assert_eq!(p.tokens, 2);
        // token + literal + offset + trailing token
        assert_eq!(p.encoded_size, 5);
    }

    #[test]
    fn four_identical_bytes_stay_literal() {
        // The only prior occurrence overlaps forward; a length-3 match is
        // below the format minimum, so all four bytes are literals.
        let p = parse_block(b"zzzz");
        assert_eq!(p.commands, vec![Command::Literals { len: 4 }]);
        assert_eq!(p.tokens, 1);
    }

    #[test]
    fn incompressible_bytes_are_one_run() {
        let block: Vec<u8> = (0..32u8).collect();
        let p = parse_block(&block);
        assert_eq!(p.commands, vec![Command::Literals { len: 32 }]);
        // token + ext byte (32 = 15 + 17) + 32 literals
        assert_eq!(p.encoded_size, 1 + 1 + 32);
    }

    #[test]
    fn cost_matches_encoder_output() {
        let repeated = b"ABCDEFGH".repeat(64);
        let samples: &[&[u8]] = &[
            b"aaaaaaaa",
            b"the quick fox, the quick dog, the quick fox again",
            &repeated,
            b"abcabcabcabcabcabcabcabcabcabc",
        ];
        for block in samples {
            let p = parse_block(block);
            assert_eq!(covered(&p), block.len());
            if let Some(encoded) = encode_block(block, &p.commands) {
                assert_eq!(encoded.len(), p.encoded_size, "block {:?}", block);
            } else {
                assert!(p.encoded_size >= block.len());
            }
        }
    }

    #[test]
    fn parse_decodes_back_to_block() {
        let block = b"she sells sea shells by the sea shore; she sells sea shells";
        let p = parse_block(block);
        let encoded = encode_block(block, &p.commands).unwrap();
        let mut out = vec![0u8; block.len()];
        let n = crate::block::decode_block(&encoded, &mut out, 0).unwrap();
        assert_eq!(&out[..n], block);
    }

    #[test]
    fn matches_may_reach_into_history_prefix() {
        let mut window = Vec::new();
        window.extend_from_slice(b"ABCDEFGH"); // history
        window.extend_from_slice(b"ABCDEFGH"); // block
        let p = optimal_parse(&window, 8);
        assert_eq!(p.commands, vec![Command::Match { offset: 8, len: 8 }]);
        assert_eq!(p.encoded_size, 4);
    }
}
