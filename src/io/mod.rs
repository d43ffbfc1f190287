//! File I/O: stream abstraction and the file-level drivers.

pub mod driver;
pub mod stream;

pub use driver::{compress_file, decompress_file, load_dictionary, Prefs};
pub use stream::{CompareSink, FileSink, FileSource, InStream, OutStream};
