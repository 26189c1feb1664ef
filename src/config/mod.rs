//! Typed job configuration.
//!
//! Layers, lowest to highest: built-in defaults, an optional TOML file, then
//! environment variables. The CLI applies its flags on top. Fails fast on
//! unparseable values.

use crate::error::{Error, Result};
use crate::model::Mode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default input file read by every job.
pub const DEFAULT_INPUT: &str = "linepool.data";
/// Stem of the output file; the mode name is appended as the extension.
pub const DEFAULT_OUTPUT_STEM: &str = "linepool";
pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_JITTER_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: PathBuf,
    /// Explicit output path. `None` derives one from the mode.
    pub output: Option<PathBuf>,
    pub workers: usize,
    /// Upper bound (exclusive) of the per-line jitter pause. Zero disables it.
    pub jitter_ms: u64,
    /// Fixed jitter seed for reproducible runs.
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: None,
            workers: DEFAULT_WORKERS,
            jitter_ms: DEFAULT_JITTER_MS,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("bad config file {}: {e}", path.display())))
    }

    /// Defaults overlaid with environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Overlay `LINEPOOL_*` and `LOG_LEVEL` environment variables.
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(input) = optional_var("LINEPOOL_INPUT") {
            self.input = PathBuf::from(input);
        }
        if let Some(output) = optional_var("LINEPOOL_OUTPUT") {
            self.output = Some(PathBuf::from(output));
        }
        if let Some(workers) = parsed_var("LINEPOOL_WORKERS")? {
            self.workers = workers;
        }
        if let Some(jitter_ms) = parsed_var("LINEPOOL_JITTER_MS")? {
            self.jitter_ms = jitter_ms;
        }
        if let Some(seed) = parsed_var("LINEPOOL_SEED")? {
            self.seed = Some(seed);
        }
        if let Some(level) = optional_var("LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(self)
    }

    /// Reject settings no job can run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("worker count must be positive".to_string()));
        }
        if self.input.as_os_str().is_empty() {
            return Err(Error::Config("input path is empty".to_string()));
        }
        Ok(())
    }

    /// Output path for a run in `mode`: the explicit one, or `linepool.<mode>`.
    pub fn output_for(&self, mode: Mode) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{DEFAULT_OUTPUT_STEM}.{mode}")))
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_millis(self.jitter_ms)
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parsed_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_var(name)
        .map(|raw| {
            raw.parse()
                .map_err(|e| Error::Config(format!("{name}=\"{raw}\" is invalid: {e}")))
        })
        .transpose()
}
