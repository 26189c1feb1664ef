//! Error types for linepool.
//!
//! Every variant is fatal for the job: there is no retry or partial-success path.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::WorkerId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{op} failed for {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: WorkerId,
        #[source]
        source: std::io::Error,
    },

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: WorkerId },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
