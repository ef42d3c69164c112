//! Lazy, forward-only reader over a JSONL dataset file.
//!
//! - Each physical line is trimmed; blank lines are skipped
//! - Lines that are not a valid [`Record`] (bad JSON, wrong shape, invalid
//!   UTF-8) are skipped and do not advance the logical index
//! - A missing file reads as an empty stream
//! - Any other I/O error is yielded once and ends the stream
//!
//! The file handle is owned by the stream and closed when it is dropped,
//! including when a caller stops iterating early.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use super::types::Record;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A record together with where its line starts in the file
#[derive(Debug, Clone)]
pub struct Entry {
    /// Byte offset of the start of the physical line
    pub offset: u64,
    /// 1-based physical line number
    pub line: usize,
    /// The trimmed line exactly as stored
    pub text: String,
    pub record: Record,
}

/// Streaming reader yielding valid records in file order
#[derive(Debug)]
pub struct RecordStream<R> {
    inner: Option<R>,
    buf: Vec<u8>,
    position: u64,
    line: usize,
    skipped: usize,
}

impl RecordStream<BufReader<File>> {
    /// Open a dataset file; a missing file yields an empty stream
    pub fn open(path: &Path) -> io::Result<Self> {
        match File::open(path) {
            Ok(file) => Ok(Self::new(BufReader::new(file))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "dataset file not found, reading as empty");
                Ok(Self::empty())
            }
            Err(e) => Err(e),
        }
    }

    /// Open a dataset file positioned at `offset`, which must be the start
    /// of a line. Lines are numbered from 1 again at that point.
    pub fn open_at(path: &Path, offset: u64) -> io::Result<Self> {
        let mut stream = Self::open(path)?;
        if let Some(reader) = stream.inner.as_mut() {
            reader.seek(SeekFrom::Start(offset))?;
            stream.position = offset;
        }
        Ok(stream)
    }
}

impl<R: BufRead> RecordStream<R> {
    /// Wrap any buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            inner: Some(reader),
            buf: Vec::new(),
            position: 0,
            line: 0,
            skipped: 0,
        }
    }

    /// A stream with nothing in it
    pub fn empty() -> Self {
        Self {
            inner: None,
            buf: Vec::new(),
            position: 0,
            line: 0,
            skipped: 0,
        }
    }

    /// Number of non-blank lines skipped as malformed so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Next valid record with its byte offset and line number
    pub fn next_entry(&mut self) -> Option<io::Result<Entry>> {
        loop {
            let reader = self.inner.as_mut()?;
            self.buf.clear();
            let read = match reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.inner = None;
                    return None;
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.inner = None;
                    return Some(Err(e));
                }
            };

            let offset = self.position;
            self.position += read as u64;
            self.line += 1;

            let mut bytes = self.buf.as_slice();
            if offset == 0 {
                bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            }
            let bytes = bytes.trim_ascii();
            if bytes.is_empty() {
                continue;
            }

            match serde_json::from_slice::<Record>(bytes) {
                Ok(record) => {
                    // from_slice already rejected invalid UTF-8
                    let text = String::from_utf8_lossy(bytes).into_owned();
                    return Some(Ok(Entry {
                        offset,
                        line: self.line,
                        text,
                        record,
                    }));
                }
                Err(e) => {
                    self.skipped += 1;
                    tracing::debug!(line = self.line, error = %e, "skipping malformed record");
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for RecordStream<R> {
    type Item = io::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().map(|entry| entry.map(|e| e.record))
    }
}
