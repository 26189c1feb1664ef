//! Line-oriented input and output streams shared by every worker.
//!
//! Both file-backed streams go straight through `&File` with no user-space
//! buffer, so the OS file cursor is the only cursor. Callers that do not
//! serialize access race on it.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Shared source of input lines.
pub trait LineSource: Sync {
    /// Next line with its terminator stripped, or `None` once the input is
    /// exhausted. Keeps returning `None` after exhaustion.
    fn next_line(&self) -> Result<Option<String>>;
}

/// Shared sink for output lines.
pub trait LineSink: Sync {
    /// Append `text` followed by a line terminator.
    fn append_line(&self, text: &str) -> Result<()>;
}

impl<T: LineSource + ?Sized> LineSource for &T {
    fn next_line(&self) -> Result<Option<String>> {
        (**self).next_line()
    }
}

impl<T: LineSink + ?Sized> LineSink for &T {
    fn append_line(&self, text: &str) -> Result<()> {
        (**self).append_line(text)
    }
}

/// Input file read one byte at a time through the shared OS cursor.
#[derive(Debug)]
pub struct FileSource {
    file: File,
    path: PathBuf,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| Error::io("open input", &path, e))?;
        Ok(Self { file, path })
    }
}

impl LineSource for FileSource {
    fn next_line(&self) -> Result<Option<String>> {
        let mut file = &self.file;
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            match file.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => return Ok(Some(decode(line))),
                Ok(_) => line.push(byte[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io("read input", &self.path, e)),
            }
        }

        // Final line without a terminator still counts.
        if line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(decode(line)))
        }
    }
}

/// Output file, created or truncated on open.
#[derive(Debug)]
pub struct FileSink {
    file: File,
    path: PathBuf,
}

impl FileSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| Error::io("create output", &path, e))?;
        Ok(Self { file, path })
    }
}

impl LineSink for FileSink {
    fn append_line(&self, text: &str) -> Result<()> {
        let mut record = Vec::with_capacity(text.len() + 1);
        record.extend_from_slice(text.as_bytes());
        record.push(b'\n');

        let mut file = &self.file;
        file.write_all(&record)
            .map_err(|e| Error::io("write output", &self.path, e))
    }
}

fn decode(mut line: Vec<u8>) -> String {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    // A racing reader can split a multi-byte character.
    match String::from_utf8(line) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
