// e2e/dictionary.rs — dictionary-assisted compression: boundary matches,
// neutrality (same dictionary on both sides roundtrips), and the behavior
// when the wrong dictionary is supplied.

use lz4opt::error::CodecError;
use lz4opt::frame::compress::compress_frame;
use lz4opt::frame::decompress::decompress_frame;
use lz4opt::io::stream::{CompareSink, OutStream};
use lz4opt::FrameDescriptor;

fn descriptor() -> FrameDescriptor {
    FrameDescriptor {
        block_max_code: 7,
        independent: false,
        content_checksum: false,
    }
}

fn compress_with(data: &[u8], dict: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    compress_frame(&mut &data[..], &mut out, descriptor(), dict, &mut |_, _| {}).unwrap();
    out
}

fn decompress_with(framed: &[u8], dict: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    decompress_frame(&mut &framed[..], &mut out, dict, &mut |_, _| {})?;
    Ok(out)
}

#[test]
fn input_equal_to_dictionary_becomes_one_match() {
    let dict = b"ABCDEFGH";
    let framed = compress_with(b"ABCDEFGH", dict);
    // Block payload: token (0 literals, match length 8), offset 8, trailing
    // literal-only token — 4 bytes for 8 bytes of input.
    let payload = &framed[11..15];
    assert_eq!(payload, &[0x04, 0x08, 0x00, 0x00]);
    assert_eq!(decompress_with(&framed, dict).unwrap(), b"ABCDEFGH");
}

#[test]
fn dictionary_neutrality_at_the_boundary() {
    let dict = b"the common preamble shared by every message in the fleet";
    let data = b"the common preamble shared by every message in the fleet, then news"
        .repeat(30);
    let framed = compress_with(&data, dict);
    let bare = compress_with(&data, b"");
    assert!(framed.len() <= bare.len());
    assert_eq!(decompress_with(&framed, dict).unwrap(), data);
}

#[test]
fn wrong_dictionary_never_claims_success() {
    let dict = b"0123456789abcdef0123456789abcdef";
    let data = b"0123456789abcdef0123456789abcdefXYZ".repeat(12);
    let framed = compress_with(&data, dict);

    // Decoding with a different dictionary either fails outright or decodes
    // to different bytes; the comparing sink must flag the first divergence
    // rather than report success.
    let wrong = b"fedcba9876543210fedcba9876543210";
    let mut sink = CompareSink::new(&data[..]);
    let outcome = decompress_frame(&mut &framed[..], &mut sink, wrong, &mut |_, _| {})
        .and_then(|_| sink.close());
    match outcome {
        Err(CodecError::VerifyMismatch { offset }) => assert!((offset as usize) < data.len()),
        Err(_) => {}
        Ok(()) => panic!("wrong dictionary must not verify"),
    }
}

#[test]
fn oversized_dictionary_uses_its_tail() {
    // Only the final 65535 bytes of a dictionary are reachable; bytes past
    // that cannot affect the stream.
    let mut big = vec![b'x'; 70_000];
    let tail = b"needle that the input will match";
    let cut = big.len() - tail.len();
    big[cut..].copy_from_slice(tail);

    let data = tail.repeat(40);
    let framed_big = compress_with(&data, &big);
    let framed_tail = compress_with(&data, &big[big.len() - 65535..]);
    assert_eq!(framed_big, framed_tail);
    assert_eq!(decompress_with(&framed_big, &big).unwrap(), data);
}

#[test]
fn dictionary_applies_to_every_independent_block() {
    let dict = b"shared header shared header shared header";
    let data = dict.repeat(4000); // several 64 KiB blocks
    let desc = FrameDescriptor {
        block_max_code: 4,
        independent: true,
        content_checksum: false,
    };
    let mut framed = Vec::new();
    compress_frame(&mut data.as_slice(), &mut framed, desc, dict, &mut |_, _| {}).unwrap();
    let mut decoded = Vec::new();
    decompress_frame(&mut framed.as_slice(), &mut decoded, dict, &mut |_, _| {}).unwrap();
    assert_eq!(decoded, data);
}
