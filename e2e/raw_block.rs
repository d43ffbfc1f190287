// e2e/raw_block.rs — raw single-block mode: footer shape, size limits, and
// the incompressible-input refusal.

use lz4opt::error::CodecError;
use lz4opt::frame::compress::compress_raw_block;
use lz4opt::frame::decompress::decompress_raw_block;

fn raw_compress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    compress_raw_block(&mut &data[..], &mut out, b"", &mut |_, _| {})?;
    Ok(out)
}

fn raw_decompress(raw: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    decompress_raw_block(&mut &raw[..], &mut out, b"", &mut |_, _| {})?;
    Ok(out)
}

fn pseudo_random(seed: u64, len: usize) -> Vec<u8> {
    let mut state = seed | 1;
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
fn hundred_zero_bytes_compress_with_zero_footer() {
    let data = vec![0u8; 100];
    let raw = raw_compress(&data).unwrap();
    assert!(raw.len() < data.len());
    assert_eq!(&raw[raw.len() - 2..], &[0, 0]);
    assert_eq!(raw_decompress(&raw).unwrap(), data);
}

#[test]
fn random_bytes_are_refused() {
    let data = pseudo_random(1234, 100);
    assert!(matches!(
        raw_compress(&data),
        Err(CodecError::RawUncompressible)
    ));
}

#[test]
fn exactly_64k_minus_one_is_accepted() {
    let data = vec![b'.'; 65535];
    let raw = raw_compress(&data).unwrap();
    assert_eq!(raw_decompress(&raw).unwrap(), data);
}

#[test]
fn sixty_four_kibibytes_is_too_large() {
    let data = vec![b'.'; 65536];
    assert!(matches!(
        raw_compress(&data),
        Err(CodecError::RawTooLarge { size: 65536 })
    ));
}

#[test]
fn empty_input_cannot_be_raw_compressed() {
    // The minimal encoding (one empty literal token) is larger than zero
    // source bytes, so raw mode refuses.
    assert!(matches!(
        raw_compress(b""),
        Err(CodecError::RawUncompressible)
    ));
}

#[test]
fn missing_footer_is_a_format_error() {
    let data = vec![0u8; 100];
    let mut raw = raw_compress(&data).unwrap();
    let end = raw.len() - 1;
    raw[end] = 1;
    assert!(matches!(raw_decompress(&raw), Err(CodecError::Format(_))));
    assert!(matches!(
        raw_decompress(&[0x00]),
        Err(CodecError::Format(_))
    ));
}

#[test]
fn text_roundtrips_through_raw_mode() {
    let data = b"raw mode carries one block and nothing else; ".repeat(80);
    let raw = raw_compress(&data).unwrap();
    assert!(raw.len() < data.len());
    assert_eq!(raw_decompress(&raw).unwrap(), data);
}
