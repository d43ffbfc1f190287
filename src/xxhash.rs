//! Thin wrapper around the `xxhash-rust` crate providing the XXH32 API used
//! by the rest of this crate.
//!
//! Only XXH32 is needed: the frame layer uses it for the single-byte header
//! checksum and for the optional 32-bit content checksum.

pub use xxhash_rust::xxh32::Xxh32 as Xxh32State;

/// One-shot XXH32 hash of `data` with the given `seed`.
///
/// # Reference vectors
/// * `xxh32_oneshot(b"", 0)` == `0x02CC5D05`
#[inline]
pub fn xxh32_oneshot(data: &[u8], seed: u32) -> u32 {
    xxhash_rust::xxh32::xxh32(data, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_vector() {
        assert_eq!(xxh32_oneshot(b"", 0), 0x02CC_5D05);
    }

    #[test]
    fn streaming_matches_oneshot() {
        let data = b"suffix arrays order all rotations";
        let mut state = Xxh32State::new(0);
        state.update(&data[..7]);
        state.update(&data[7..]);
        assert_eq!(state.digest(), xxh32_oneshot(data, 0));
    }
}
