// e2e/cli_integration.rs — black-box tests of the `lz4opt` binary:
// argument handling, exit codes (0 on success, 100 on any error), verify
// mode, raw mode, block options, and dictionaries.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Locate the `lz4opt` binary produced by Cargo.
fn lz4opt_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_lz4opt") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("lz4opt");
    p
}

fn run(args: &[&str]) -> std::process::ExitStatus {
    Command::new(lz4opt_bin())
        .args(args)
        .status()
        .expect("failed to spawn lz4opt")
}

fn path_str(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_owned()
}

fn compressible(len: usize) -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog; "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn incompressible(len: usize) -> Vec<u8> {
    let mut state = 0x1957_0618_2354_7737u64;
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
fn compress_decompress_roundtrip() {
    let dir = TempDir::new().unwrap();
    let input = path_str(&dir, "input.txt");
    let packed = path_str(&dir, "input.txt.lz4o");
    let output = path_str(&dir, "roundtrip.txt");
    let data = compressible(100_000);
    fs::write(&input, &data).unwrap();

    assert!(run(&[input.as_str(), packed.as_str()]).success());
    assert!(fs::metadata(&packed).unwrap().len() < data.len() as u64);
    assert!(run(&["-d", packed.as_str(), output.as_str()]).success());
    assert_eq!(fs::read(&output).unwrap(), data);
}

#[test]
fn verify_flag_passes_on_good_data() {
    let dir = TempDir::new().unwrap();
    let input = path_str(&dir, "input.bin");
    let packed = path_str(&dir, "packed.lz4o");
    fs::write(&input, compressible(50_000)).unwrap();
    assert!(run(&["-c", "-v", input.as_str(), packed.as_str()]).success());
}

#[test]
fn exit_code_is_100_on_usage_errors() {
    let empty: [&str; 0] = [];
    assert_eq!(run(&empty).code(), Some(100));
    assert_eq!(run(&["-x", "a", "b"]).code(), Some(100));
    assert_eq!(run(&["only-one-file"]).code(), Some(100));
    assert_eq!(run(&["-B9", "a", "b"]).code(), Some(100));
}

#[test]
fn exit_code_is_100_on_missing_input() {
    let dir = TempDir::new().unwrap();
    let missing = path_str(&dir, "does-not-exist");
    let out = path_str(&dir, "out.lz4o");
    assert_eq!(run(&[missing.as_str(), out.as_str()]).code(), Some(100));
}

#[test]
fn existing_output_requires_force() {
    let dir = TempDir::new().unwrap();
    let input = path_str(&dir, "input.bin");
    let packed = path_str(&dir, "packed.lz4o");
    fs::write(&input, compressible(10_000)).unwrap();
    fs::write(&packed, b"already here").unwrap();

    assert_eq!(run(&[input.as_str(), packed.as_str()]).code(), Some(100));
    assert!(run(&["-f", input.as_str(), packed.as_str()]).success());
}

#[test]
fn corrupted_stream_fails_decompression() {
    let dir = TempDir::new().unwrap();
    let input = path_str(&dir, "input.bin");
    let packed = path_str(&dir, "packed.lz4o");
    let output = path_str(&dir, "out.bin");
    fs::write(&input, compressible(20_000)).unwrap();
    assert!(run(&[input.as_str(), packed.as_str()]).success());

    let mut bytes = fs::read(&packed).unwrap();
    bytes[4] ^= 0x80; // descriptor flags
    fs::write(&packed, &bytes).unwrap();
    assert_eq!(
        run(&["-d", "-f", packed.as_str(), output.as_str()]).code(),
        Some(100)
    );
}

#[test]
fn block_options_roundtrip() {
    let dir = TempDir::new().unwrap();
    let input = path_str(&dir, "input.bin");
    let data = compressible(300_000);
    fs::write(&input, &data).unwrap();

    for opts in [["-B4", "-BD"], ["-B5", "-BI"], ["-B6", "-BD"], ["-B7", "-BI"]] {
        let packed = path_str(&dir, &format!("packed{}{}.lz4o", opts[0], opts[1]));
        let output = path_str(&dir, &format!("out{}{}.bin", opts[0], opts[1]));
        assert!(run(&[opts[0], opts[1], "-f", input.as_str(), packed.as_str()]).success());
        assert!(run(&["-d", "-f", packed.as_str(), output.as_str()]).success());
        assert_eq!(fs::read(&output).unwrap(), data);
    }
}

#[test]
fn raw_mode_zeroes_succeed_and_noise_fails() {
    let dir = TempDir::new().unwrap();
    let zeros = path_str(&dir, "zeros.bin");
    let packed = path_str(&dir, "zeros.raw");
    let output = path_str(&dir, "zeros.out");
    fs::write(&zeros, vec![0u8; 100]).unwrap();

    assert!(run(&["-r", zeros.as_str(), packed.as_str()]).success());
    let raw = fs::read(&packed).unwrap();
    assert_eq!(&raw[raw.len() - 2..], &[0, 0]);
    assert!(run(&["-r", "-d", packed.as_str(), output.as_str()]).success());
    assert_eq!(fs::read(&output).unwrap(), vec![0u8; 100]);

    let noise = path_str(&dir, "noise.bin");
    fs::write(&noise, incompressible(100)).unwrap();
    let packed = path_str(&dir, "noise.raw");
    assert_eq!(
        run(&["-r", noise.as_str(), packed.as_str()]).code(),
        Some(100)
    );
}

#[test]
fn raw_mode_rejects_oversized_input() {
    let dir = TempDir::new().unwrap();
    let input = path_str(&dir, "big.bin");
    let packed = path_str(&dir, "big.raw");
    fs::write(&input, vec![0u8; 65536]).unwrap();
    assert_eq!(run(&["-r", input.as_str(), packed.as_str()]).code(), Some(100));
}

#[test]
fn dictionary_roundtrip_through_cli() {
    let dir = TempDir::new().unwrap();
    let dict = path_str(&dir, "dict.bin");
    let input = path_str(&dir, "input.bin");
    let packed = path_str(&dir, "packed.lz4o");
    let output = path_str(&dir, "out.bin");
    fs::write(&dict, b"a body of shared context for short messages").unwrap();
    let data = b"a body of shared context for short messages plus one update";
    fs::write(&input, data).unwrap();

    assert!(run(&["-D", dict.as_str(), "-c", input.as_str(), packed.as_str()]).success());
    assert!(run(&["-d", "-D", dict.as_str(), packed.as_str(), output.as_str()]).success());
    assert_eq!(fs::read(&output).unwrap(), data);
}

#[test]
fn help_and_version_exit_zero() {
    assert!(run(&["-h"]).success());
    assert!(run(&["-V"]).success());
    assert!(run(&["--help"]).success());
    assert!(run(&["--version"]).success());
}

#[test]
fn mtime_is_preserved() {
    let dir = TempDir::new().unwrap();
    let input = path_str(&dir, "input.bin");
    let packed = path_str(&dir, "packed.lz4o");
    fs::write(&input, compressible(5_000)).unwrap();
    let old = filetime::FileTime::from_unix_time(1_500_000_000, 0);
    filetime::set_file_mtime(&input, old).unwrap();

    assert!(run(&[input.as_str(), packed.as_str()]).success());
    let meta = fs::metadata(&packed).unwrap();
    assert_eq!(filetime::FileTime::from_last_modification_time(&meta), old);
}
