//! Binary entry point for the `lz4opt` command-line tool.
//!
//! Parses arguments, dispatches to the file drivers, and maps every failure
//! to the single error exit code 100.  Diagnostics go to stderr; progress
//! and summaries go to stdout (see [`lz4opt::cli::constants`]).

use std::time::Instant;

use lz4opt::cli::args::{parse_args, OpMode, ParsedArgs};
use lz4opt::cli::constants::TOOL_NAME;
use lz4opt::displaylevel;
use lz4opt::{compress_file, decompress_file};

/// Exit code for every error class: usage, I/O, format, checksum,
/// compression, decompression.
const EXIT_ERROR: i32 = 100;

fn run(args: &ParsedArgs) -> Result<(), lz4opt::CodecError> {
    let started = Instant::now();
    match args.op_mode {
        OpMode::Compress => {
            let stats = compress_file(&args.input, &args.output, &args.prefs)?;
            let secs = started.elapsed().as_secs_f64();
            let mbps = stats.bytes_in as f64 / (1024.0 * 1024.0) / secs.max(1e-9);
            displaylevel!(
                3,
                "done in {:.3}s, {:.1} MB/s, {} tokens, ratio {:.2}%\n",
                secs,
                mbps,
                stats.tokens,
                if stats.bytes_in > 0 {
                    stats.bytes_out as f64 * 100.0 / stats.bytes_in as f64
                } else {
                    0.0
                }
            );
        }
        OpMode::Decompress => {
            let stats = decompress_file(&args.input, &args.output, &args.prefs)?;
            let secs = started.elapsed().as_secs_f64();
            let mbps = stats.bytes_out as f64 / (1024.0 * 1024.0) / secs.max(1e-9);
            displaylevel!(3, "done in {:.3}s, {:.1} MB/s\n", secs, mbps);
        }
    }
    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{TOOL_NAME}: {e}");
            std::process::exit(EXIT_ERROR);
        }
    };
    if args.exit_early {
        return;
    }
    if let Err(e) = run(&args) {
        eprintln!("{TOOL_NAME}: {e}");
        std::process::exit(EXIT_ERROR);
    }
}
