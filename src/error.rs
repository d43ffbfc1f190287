//! Crate-wide error type.
//!
//! One enum covers every failure the compressor, decompressor, and stream
//! drivers can surface.  Errors are never retried: the driver prints a
//! specific diagnostic and the process exits non-zero.  All variants carry
//! enough context to identify the failure without a backtrace.

use core::fmt;
use std::io;

/// Errors surfaced by compression, decompression, and the stream drivers.
#[derive(Debug)]
pub enum CodecError {
    /// The input file or stream could not be read.
    SrcIo(io::Error),
    /// The output file or stream could not be written.
    DstIo(io::Error),
    /// The dictionary file could not be read.
    Dictionary(io::Error),
    /// Verify mode found a decoded byte differing from the source.
    /// `offset` is the position of the first differing byte.
    VerifyMismatch { offset: u64 },
    /// Raw block mode: the source exceeds the 65535-byte block limit.
    RawTooLarge { size: u64 },
    /// Raw block mode: the source does not compress below its own size and
    /// raw mode has no uncompressed-block escape.
    RawUncompressible,
    /// The frame magic, version, or descriptor is invalid.
    Format(&'static str),
    /// The frame header checksum byte or content checksum does not match.
    Checksum(&'static str),
    /// A compressed block is malformed (bad offset, truncated run, or
    /// oversized output).
    Corrupt(&'static str),
    /// An internal invariant of the parser or encoder was violated.
    /// Indicates a bug, not bad input.
    CompressInternal(&'static str),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::SrcIo(e) => write!(f, "cannot read input: {e}"),
            CodecError::DstIo(e) => write!(f, "cannot write output: {e}"),
            CodecError::Dictionary(e) => write!(f, "cannot read dictionary: {e}"),
            CodecError::VerifyMismatch { offset } => {
                write!(f, "verification failed: first difference at byte {offset}")
            }
            CodecError::RawTooLarge { size } => {
                write!(f, "raw block mode accepts at most 65535 bytes, input is {size}")
            }
            CodecError::RawUncompressible => {
                write!(f, "input is not compressible in raw block mode")
            }
            CodecError::Format(what) => write!(f, "invalid frame: {what}"),
            CodecError::Checksum(what) => write!(f, "checksum mismatch: {what}"),
            CodecError::Corrupt(what) => write!(f, "corrupt compressed data: {what}"),
            CodecError::CompressInternal(what) => {
                write!(f, "internal compression error: {what}")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::SrcIo(e) | CodecError::DstIo(e) | CodecError::Dictionary(e) => Some(e),
            _ => None,
        }
    }
}
