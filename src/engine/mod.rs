//! Worker pool engine: job definition, jitter policy, worker loop, dispatcher.

pub mod dispatcher;
pub mod jitter;
pub mod job;
mod worker;

pub use dispatcher::Dispatcher;
pub use jitter::Jitter;
pub use job::Job;

use std::path::Path;

use crate::error::Result;
use crate::model::{Mode, RunReport};

/// Drain the file at `input` into a freshly created `output` with `workers`
/// threads under `mode`.
pub fn run(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    mode: Mode,
    workers: usize,
    jitter: Jitter,
) -> Result<RunReport> {
    let job = Job::open(input, output, mode, workers)?;
    Dispatcher::new(jitter).run(job)
}
