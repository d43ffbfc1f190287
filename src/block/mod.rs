//! LZ4 block-format engine: command types, encoder, and decoder.

pub mod decode;
pub mod encode;
pub mod types;

pub use decode::{decode_block, DecodeError};
pub use encode::encode_block;
pub use types::{Command, MAX_MATCH, MAX_OFFSET, MIN_MATCH};
