//! A job: the two shared streams plus how many workers drain them, and how.

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Mode;
use crate::stream::{FileSink, FileSource};

/// One invocation's worth of work. Immutable once built; owns both streams
/// until the dispatcher drops it after every worker has finished.
#[derive(Debug)]
pub struct Job<S, W> {
    source: S,
    sink: W,
    mode: Mode,
    workers: usize,
}

impl<S, W> Job<S, W> {
    pub fn new(source: S, sink: W, mode: Mode, workers: usize) -> Result<Self> {
        validate_workers(workers)?;
        Ok(Self {
            source,
            sink,
            mode,
            workers,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Job<FileSource, FileSink> {
    /// Open `input` for reading and create (or truncate) `output`.
    ///
    /// The worker count is checked before either file is touched.
    pub fn open(
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        mode: Mode,
        workers: usize,
    ) -> Result<Self> {
        validate_workers(workers)?;
        let source = FileSource::open(input)?;
        let sink = FileSink::create(output)?;
        Self::new(source, sink, mode, workers)
    }
}

fn validate_workers(workers: usize) -> Result<()> {
    if workers == 0 {
        return Err(Error::Config("worker count must be positive".to_string()));
    }
    if u32::try_from(workers).is_err() {
        return Err(Error::Config(format!(
            "worker count {workers} exceeds {}",
            u32::MAX
        )));
    }
    Ok(())
}
