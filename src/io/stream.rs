//! Byte-stream abstraction consumed by the frame layer.
//!
//! The codec core never touches files directly: it reads from an
//! [`InStream`] and writes to an [`OutStream`].  File-backed implementations
//! cover the normal paths; [`CompareSink`] implements verify mode by
//! matching every "written" byte against a reference file and failing the
//! write at the first difference.  In-memory implementations (`&[u8]`,
//! `Vec<u8>`) make the codec testable without touching the filesystem.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::CodecError;

/// Source of uncompressed or compressed bytes.
pub trait InStream {
    /// Read up to `buf.len()` bytes; 0 means end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecError>;

    /// True once a read has observed the end of the stream.
    fn eof(&self) -> bool;

    /// Read until `buf` is full or the stream ends; returns bytes read.
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }
}

/// Destination for produced bytes.
pub trait OutStream {
    /// Write all of `buf` or fail.
    fn write(&mut self, buf: &[u8]) -> Result<(), CodecError>;

    /// Flush and release the destination.  A comparing sink uses this to
    /// confirm the reference was fully consumed.
    fn close(&mut self) -> Result<(), CodecError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// File-backed implementations
// ─────────────────────────────────────────────────────────────────────────────

/// Buffered file source.
pub struct FileSource {
    reader: BufReader<File>,
    at_eof: bool,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self, CodecError> {
        let file = File::open(path).map_err(CodecError::SrcIo)?;
        Ok(FileSource {
            reader: BufReader::new(file),
            at_eof: false,
        })
    }
}

impl InStream for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        let n = self.reader.read(buf).map_err(CodecError::SrcIo)?;
        if n == 0 {
            self.at_eof = true;
        }
        Ok(n)
    }

    fn eof(&self) -> bool {
        self.at_eof
    }
}

/// Buffered file sink.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create the destination file.  Refuses to replace an existing file
    /// unless `overwrite` is set.
    pub fn create(path: &Path, overwrite: bool) -> Result<Self, CodecError> {
        let mut opts = std::fs::OpenOptions::new();
        opts.write(true);
        if overwrite {
            opts.create(true).truncate(true);
        } else {
            opts.create_new(true);
        }
        let file = opts.open(path).map_err(CodecError::DstIo)?;
        Ok(FileSink {
            writer: BufWriter::new(file),
        })
    }
}

impl OutStream for FileSink {
    fn write(&mut self, buf: &[u8]) -> Result<(), CodecError> {
        self.writer.write_all(buf).map_err(CodecError::DstIo)
    }

    fn close(&mut self) -> Result<(), CodecError> {
        self.writer.flush().map_err(CodecError::DstIo)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Comparing sink (verify mode)
// ─────────────────────────────────────────────────────────────────────────────

/// A sink that compares written bytes against a reference stream instead of
/// storing them.  The first differing byte fails the write with
/// [`CodecError::VerifyMismatch`]; a reference that is longer or shorter
/// than what was written is a mismatch at the divergence offset.
pub struct CompareSink<R> {
    reference: R,
    position: u64,
    chunk: Vec<u8>,
}

impl CompareSink<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, CodecError> {
        let file = File::open(path).map_err(CodecError::SrcIo)?;
        Ok(CompareSink::new(BufReader::new(file)))
    }
}

impl<R: Read> CompareSink<R> {
    pub fn new(reference: R) -> Self {
        CompareSink {
            reference,
            position: 0,
            chunk: Vec::new(),
        }
    }
}

impl<R: Read> OutStream for CompareSink<R> {
    fn write(&mut self, buf: &[u8]) -> Result<(), CodecError> {
        self.chunk.resize(buf.len(), 0);
        let mut filled = 0;
        while filled < buf.len() {
            let n = self
                .reference
                .read(&mut self.chunk[filled..])
                .map_err(CodecError::SrcIo)?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        for (i, (&got, &want)) in buf.iter().zip(&self.chunk[..filled]).enumerate() {
            if got != want {
                return Err(CodecError::VerifyMismatch {
                    offset: self.position + i as u64,
                });
            }
        }
        if filled < buf.len() {
            // Decoded output extends past the reference.
            return Err(CodecError::VerifyMismatch {
                offset: self.position + filled as u64,
            });
        }
        self.position += buf.len() as u64;
        Ok(())
    }

    fn close(&mut self) -> Result<(), CodecError> {
        let mut probe = [0u8; 1];
        let n = self.reference.read(&mut probe).map_err(CodecError::SrcIo)?;
        if n != 0 {
            // The reference has bytes the decoded output never produced.
            return Err(CodecError::VerifyMismatch {
                offset: self.position,
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory implementations
// ─────────────────────────────────────────────────────────────────────────────

impl InStream for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        let n = self.len().min(buf.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }

    fn eof(&self) -> bool {
        self.is_empty()
    }
}

impl OutStream for Vec<u8> {
    fn write(&mut self, buf: &[u8]) -> Result<(), CodecError> {
        self.extend_from_slice(buf);
        Ok(())
    }

    fn close(&mut self) -> Result<(), CodecError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_source_reads_and_reports_eof() {
        let mut src: &[u8] = b"hello";
        let mut buf = [0u8; 3];
        assert_eq!(InStream::read(&mut src, &mut buf).unwrap(), 3);
        assert!(!src.eof());
        assert_eq!(InStream::read(&mut src, &mut buf).unwrap(), 2);
        assert!(src.eof());
        assert_eq!(InStream::read(&mut src, &mut buf).unwrap(), 0);
    }

    #[test]
    fn compare_sink_accepts_identical_stream() {
        let mut sink = CompareSink::new(&b"abcdef"[..]);
        sink.write(b"abc").unwrap();
        sink.write(b"def").unwrap();
        sink.close().unwrap();
    }

    #[test]
    fn compare_sink_reports_first_difference() {
        let mut sink = CompareSink::new(&b"abcdef"[..]);
        sink.write(b"abc").unwrap();
        match sink.write(b"dXf") {
            Err(CodecError::VerifyMismatch { offset }) => assert_eq!(offset, 4),
            other => panic!("expected mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn compare_sink_detects_length_divergence() {
        // Written output longer than the reference.
        let mut sink = CompareSink::new(&b"ab"[..]);
        assert!(matches!(
            sink.write(b"abc"),
            Err(CodecError::VerifyMismatch { offset: 2 })
        ));

        // Reference longer than the written output.
        let mut sink = CompareSink::new(&b"abc"[..]);
        sink.write(b"ab").unwrap();
        assert!(matches!(
            sink.close(),
            Err(CodecError::VerifyMismatch { offset: 2 })
        ));
    }
}
