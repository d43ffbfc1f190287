//! LZ4 frame container: header handling plus the framed and raw-block
//! compress/decompress paths.

pub mod compress;
pub mod decompress;
pub mod header;

pub use compress::{compress_frame, compress_raw_block, CompressStats};
pub use decompress::{decompress_frame, decompress_raw_block, DecompressStats};
pub use header::{block_max_size, FrameDescriptor, DEFAULT_BLOCK_MAX_CODE};
