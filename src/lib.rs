//! Optimal LZ4 compressor and verifier.
//!
//! Produces LZ4 frame- and block-format output whose parse is chosen by a
//! suffix-array match-finder and a minimum-size dynamic program, trading
//! compression speed for ratio.  Decompression and a verify-by-redecompress
//! mode are included; both accept the full descriptor range this tool can
//! emit.
//!
//! Layering, leaves first: [`opt`] (suffix array, match-finder, optimal
//! parser), [`block`] (block byte-stream encoder/decoder), [`frame`] (frame
//! container, raw block mode), [`io`] (stream abstraction and file
//! drivers), [`cli`] (argument parsing for the binary).

pub mod block;
pub mod cli;
pub mod error;
pub mod frame;
pub mod io;
pub mod opt;
pub mod xxhash;

/// Crate-wide error type.
pub use error::CodecError;

/// One-shot framed compression over in-memory buffers.
pub use frame::compress::compress_frame;
/// One-shot framed decompression over in-memory buffers.
pub use frame::decompress::decompress_frame;
/// Frame parameters (block maximum, block dependency, content checksum).
pub use frame::FrameDescriptor;

/// File-level drivers used by the CLI.
pub use io::driver::{compress_file, decompress_file, Prefs};
