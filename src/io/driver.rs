//! File-level compress / decompress / verify drivers.
//!
//! These functions wire the frame layer to the filesystem: they open the
//! streams, load the dictionary, report progress, preserve the source
//! modification time on the destination, and run the verify-by-redecompress
//! pass behind `-c`.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use crate::cli::constants::display_level;
use crate::error::CodecError;
use crate::frame::header::DEFAULT_BLOCK_MAX_CODE;
use crate::frame::{
    block_max_size, compress_frame, compress_raw_block, decompress_frame,
    decompress_raw_block, CompressStats, DecompressStats, FrameDescriptor,
};
use crate::block::types::MAX_OFFSET;
use crate::io::stream::{CompareSink, FileSink, FileSource, OutStream};
use crate::{displaylevel, displayout};

/// Options carried from the CLI parse into the drivers.
#[derive(Debug, Clone)]
pub struct Prefs {
    /// Block-max code 4..=7 (64 KiB to 4 MiB); framed mode only.
    pub block_max_code: u8,
    /// Compress blocks independently instead of sharing history.
    pub independent: bool,
    /// Append and verify a content checksum.
    pub content_checksum: bool,
    /// Raw single-block mode: no frame, two-byte zero footer.
    pub raw_block: bool,
    /// Re-decode the output after compressing and compare to the source.
    pub verify: bool,
    /// Replace an existing destination file.
    pub force_overwrite: bool,
    /// Dictionary file path.
    pub dictionary: Option<String>,
}

impl Default for Prefs {
    fn default() -> Self {
        Prefs {
            block_max_code: DEFAULT_BLOCK_MAX_CODE,
            independent: false,
            content_checksum: false,
            raw_block: false,
            verify: false,
            force_overwrite: false,
            dictionary: None,
        }
    }
}

/// Load a dictionary file, keeping only its final 65535 bytes (the match
/// window cannot reach further back).
pub fn load_dictionary(path: &str) -> Result<Vec<u8>, CodecError> {
    use std::io::Read;
    let mut file = fs::File::open(path).map_err(CodecError::Dictionary)?;
    let mut dict: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut chunk).map_err(CodecError::Dictionary)?;
        if n == 0 {
            break;
        }
        dict.extend_from_slice(&chunk[..n]);
        if dict.len() > MAX_OFFSET {
            let excess = dict.len() - MAX_OFFSET;
            dict.drain(..excess);
        }
    }
    Ok(dict)
}

fn load_prefs_dictionary(prefs: &Prefs) -> Result<Vec<u8>, CodecError> {
    match &prefs.dictionary {
        Some(path) => load_dictionary(path),
        None => Ok(Vec::new()),
    }
}

/// Copy the source modification time onto the destination.  Failure is not
/// an error: the payload is already written.
fn preserve_mtime(src: &Path, dst: &Path) {
    if let Ok(meta) = fs::metadata(src) {
        let mtime = filetime::FileTime::from_last_modification_time(&meta);
        let _ = filetime::set_file_mtime(dst, mtime);
    }
}

/// Live `orig => comp (pct%)` progress on stdout at verbose level.
fn progress_line(bytes_in: u64, bytes_out: u64) {
    if display_level() >= 3 {
        let pct = if bytes_in > 0 {
            bytes_out as f64 * 100.0 / bytes_in as f64
        } else {
            0.0
        };
        displayout!("\r{bytes_in} => {bytes_out} ({pct:.2}%) ");
        let _ = std::io::stdout().flush();
    }
}

fn end_progress_line() {
    if display_level() >= 3 {
        println!();
    }
}

/// Compress `input` into `output` per `prefs`, then verify when requested.
pub fn compress_file(input: &str, output: &str, prefs: &Prefs) -> Result<CompressStats, CodecError> {
    let dict = load_prefs_dictionary(prefs)?;
    let mut src = FileSource::open(Path::new(input))?;
    let mut dst = FileSink::create(Path::new(output), prefs.force_overwrite)?;

    let stats = if prefs.raw_block {
        displaylevel!(3, "raw block mode, single block up to 64 KiB\n");
        compress_raw_block(&mut src, &mut dst, &dict, &mut progress_line)?
    } else {
        let desc = FrameDescriptor {
            block_max_code: prefs.block_max_code,
            independent: prefs.independent,
            content_checksum: prefs.content_checksum,
        };
        displaylevel!(
            3,
            "using {} KiB blocks, {} mode\n",
            block_max_size(desc.block_max_code) / 1024,
            if desc.independent { "independent" } else { "dependent" }
        );
        compress_frame(&mut src, &mut dst, desc, &dict, &mut progress_line)?
    };
    end_progress_line();
    dst.close()?;
    preserve_mtime(Path::new(input), Path::new(output));

    displaylevel!(
        2,
        "{} : {} => {} bytes ({:.2}%)\n",
        input,
        stats.bytes_in,
        stats.bytes_out,
        if stats.bytes_in > 0 {
            stats.bytes_out as f64 * 100.0 / stats.bytes_in as f64
        } else {
            0.0
        }
    );

    if prefs.verify {
        verify_file(input, output, prefs, &dict)?;
        displaylevel!(3, "verified: decoded output matches the source\n");
    }
    Ok(stats)
}

/// Decompress `input` into `output` per `prefs`.
pub fn decompress_file(
    input: &str,
    output: &str,
    prefs: &Prefs,
) -> Result<DecompressStats, CodecError> {
    let dict = load_prefs_dictionary(prefs)?;
    let mut src = FileSource::open(Path::new(input))?;
    let mut dst = FileSink::create(Path::new(output), prefs.force_overwrite)?;

    let stats = if prefs.raw_block {
        decompress_raw_block(&mut src, &mut dst, &dict, &mut progress_line)?
    } else {
        decompress_frame(&mut src, &mut dst, &dict, &mut progress_line)?
    };
    end_progress_line();
    dst.close()?;
    preserve_mtime(Path::new(input), Path::new(output));

    displaylevel!(
        2,
        "{} : decoded {} bytes\n",
        input,
        stats.bytes_out
    );
    Ok(stats)
}

/// Re-decode `compressed` and compare every byte against `original`.
fn verify_file(
    original: &str,
    compressed: &str,
    prefs: &Prefs,
    dict: &[u8],
) -> Result<(), CodecError> {
    let mut src = FileSource::open(Path::new(compressed))?;
    let mut sink = CompareSink::open(Path::new(original))?;
    if prefs.raw_block {
        decompress_raw_block(&mut src, &mut sink, dict, &mut |_, _| {})?;
    } else {
        decompress_frame(&mut src, &mut sink, dict, &mut |_, _| {})?;
    }
    sink.close()
}
