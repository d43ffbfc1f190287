// e2e/frame_roundtrip.rs — framed compression scenarios over in-memory
// streams: exact byte patterns for tiny inputs, roundtrips across the
// descriptor space, and ratio expectations on repetitive data.

use lz4opt::frame::compress::compress_frame;
use lz4opt::frame::decompress::decompress_frame;
use lz4opt::FrameDescriptor;

fn descriptor() -> FrameDescriptor {
    FrameDescriptor {
        block_max_code: 7,
        independent: false,
        content_checksum: false,
    }
}

fn compress(data: &[u8], desc: FrameDescriptor) -> Vec<u8> {
    let mut out = Vec::new();
    compress_frame(&mut &data[..], &mut out, desc, b"", &mut |_, _| {}).unwrap();
    out
}

fn decompress(framed: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    decompress_frame(&mut &framed[..], &mut out, b"", &mut |_, _| {}).unwrap();
    out
}

/// Deterministic pseudo-random bytes (64-bit LCG, high byte).
fn pseudo_random(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed.wrapping_mul(0x9E3779B97F4A7C15).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}

#[test]
fn empty_input_produces_the_minimal_frame() {
    let framed = compress(b"", descriptor());
    assert_eq!(
        framed,
        [0x04, 0x22, 0x4D, 0x18, 0x40, 0x70, 0xC0, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(decompress(&framed), b"");
}

#[test]
fn eight_a_bytes_parse_as_literal_plus_match() {
    let framed = compress(b"aaaaaaaa", descriptor());
    // Header, 5-byte block: token (1 literal, match length 7), the literal,
    // offset 1, trailing literal-only token; then the end mark.
    let payload = &framed[11..16];
    assert_eq!(payload, &[0x13, b'a', 0x01, 0x00, 0x00]);
    assert_eq!(decompress(&framed), b"aaaaaaaa");
}

#[test]
fn random_bytes_are_stored_not_grown() {
    let data = pseudo_random(42, 2048);
    let framed = compress(&data, descriptor());
    assert_eq!(decompress(&framed), data);
    // Incompressible input falls back to stored blocks: a little framing
    // overhead, never a blowup.
    assert!(framed.len() as i64 > data.len() as i64 - 16);
    assert!(framed.len() <= data.len() + 15 + 4 * (data.len() / (4 << 20) + 1));
}

#[test]
fn periodic_text_compresses_hard() {
    let data = b"ABCDEFGH".repeat(8192);
    let framed = compress(&data, descriptor());
    assert!(
        framed.len() < 1024,
        "64 KiB of period-8 data should collapse, got {}",
        framed.len()
    );
    assert_eq!(decompress(&framed), data);
}

#[test]
fn four_identical_bytes_roundtrip_as_stored_block() {
    // Four bytes parse as a bare literal run (no prior occurrence to match);
    // the five encoded bytes exceed the source, so the block is stored.
    let framed = compress(b"zzzz", descriptor());
    let word = u32::from_le_bytes(framed[7..11].try_into().unwrap());
    assert_eq!(word, 4 | 0x8000_0000);
    assert_eq!(decompress(&framed), b"zzzz");
}

#[test]
fn megabyte_of_pattern_compresses_below_two_percent() {
    let pattern: [u8; 16] = *b"0123456789abcdef";
    let data: Vec<u8> = pattern.iter().copied().cycle().take(1 << 20).collect();
    let framed = compress(&data, descriptor());
    assert!(
        framed.len() * 50 < data.len(),
        "ratio {:.3}% too high",
        framed.len() as f64 * 100.0 / data.len() as f64
    );
    assert_eq!(decompress(&framed), data);
}

#[test]
fn roundtrip_across_descriptor_space() {
    let mut data = b"all work and no play makes a dull codec; ".repeat(700);
    data.extend(pseudo_random(7, 3000));
    for code in 4..=7u8 {
        for independent in [false, true] {
            for content_checksum in [false, true] {
                let desc = FrameDescriptor {
                    block_max_code: code,
                    independent,
                    content_checksum,
                };
                let framed = compress(&data, desc);
                assert_eq!(decompress(&framed), data, "desc {desc:?}");
            }
        }
    }
}

#[test]
fn single_byte_and_boundary_sizes_roundtrip() {
    for len in [1usize, 2, 3, 4, 5, 12, 13, 15, 16, 17, 255, 256, 257] {
        let data = vec![b'q'; len];
        let framed = compress(&data, descriptor());
        assert_eq!(decompress(&framed), data, "len {len}");
        let data = pseudo_random(len as u64, len);
        let framed = compress(&data, descriptor());
        assert_eq!(decompress(&framed), data, "random len {len}");
    }
}

#[test]
fn dependent_blocks_reference_previous_block() {
    // 80 KiB of unique-ish data followed by itself: with 64 KiB blocks the
    // second copy can only compress by reaching across the block boundary.
    let chunk = pseudo_random(99, 60 * 1024);
    let mut data = chunk.clone();
    data.extend_from_slice(&chunk);
    let desc = FrameDescriptor {
        block_max_code: 4,
        independent: false,
        content_checksum: false,
    };
    let framed = compress(&data, desc);
    assert!(framed.len() < data.len() * 3 / 4);
    assert_eq!(decompress(&framed), data);

    // Independent blocks cannot reach back; the stream stays near-stored
    // but must still roundtrip.
    let desc = FrameDescriptor {
        block_max_code: 4,
        independent: true,
        content_checksum: false,
    };
    let framed_indep = compress(&data, desc);
    assert!(framed_indep.len() > framed.len());
    assert_eq!(decompress(&framed_indep), data);
}
