//! Core data model.
//!
//! A job drains one input stream into one output stream through a fixed pool
//! of workers. The mode decides whether a shared lock serializes each
//! worker's read-then-write step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Synchronization policy for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// One shared lock encloses every read and its paired write.
    #[serde(rename = "mutex")]
    Guarded,
    /// Workers read and write with no coordination.
    #[serde(rename = "nomutex")]
    Unguarded,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Guarded => "mutex",
            Mode::Unguarded => "nomutex",
        }
    }

    pub fn is_guarded(self) -> bool {
        matches!(self, Mode::Guarded)
    }
}

impl std::str::FromStr for Mode {
    type Err = Error;

    /// Case-exact: only `mutex` and `nomutex` are accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mutex" => Ok(Mode::Guarded),
            "nomutex" => Ok(Mode::Unguarded),
            other => Err(Error::Config(format!(
                "unknown mode \"{other}\" (expected \"mutex\" or \"nomutex\")"
            ))),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Worker identity and state
// ---------------------------------------------------------------------------

/// 1-based worker identity, unique within a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId(pub u32);

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle state of a worker loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Still polling the shared input.
    Running,
    /// Observed end-of-input. Terminal.
    Done,
}

impl State {
    /// Can transition from self to `to`?
    pub fn can_transition_to(self, to: State) -> bool {
        matches!((self, to), (State::Running, State::Done))
    }

    /// Is this a terminal state?
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Done)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            State::Running => "running",
            State::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// Format an input line for the output stream: `<line>\t<worker>`.
pub fn tag_line(line: &str, worker: WorkerId) -> String {
    format!("{line}\t{worker}")
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What a single worker did before it terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    pub worker: WorkerId,
    /// Tagged lines this worker appended to the output.
    pub lines: u64,
}

/// Summary of one completed job run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub job_id: Uuid,
    pub mode: Mode,
    /// One entry per worker, ordered by worker id.
    pub workers: Vec<WorkerReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Total lines written across all workers.
    pub fn total_lines(&self) -> u64 {
        self.workers.iter().map(|w| w.lines).sum()
    }

    pub fn duration_ms(&self) -> u64 {
        (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parse_is_case_exact() {
        assert_eq!("mutex".parse::<Mode>().unwrap(), Mode::Guarded);
        assert_eq!("nomutex".parse::<Mode>().unwrap(), Mode::Unguarded);
        assert!("Mutex".parse::<Mode>().is_err());
        assert!("NOMUTEX".parse::<Mode>().is_err());
        assert!(" mutex".parse::<Mode>().is_err());
        assert!("".parse::<Mode>().is_err());
    }

    #[test]
    fn mode_display_round_trips() {
        for mode in [Mode::Guarded, Mode::Unguarded] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn only_running_to_done_is_allowed() {
        assert!(State::Running.can_transition_to(State::Done));
        assert!(!State::Done.can_transition_to(State::Running));
        assert!(!State::Running.can_transition_to(State::Running));
        assert!(State::Done.is_terminal());
        assert!(!State::Running.is_terminal());
    }

    #[test]
    fn tag_uses_tab_and_decimal_id() {
        assert_eq!(tag_line("alpha", WorkerId(7)), "alpha\t7");
        assert_eq!(tag_line("", WorkerId(12)), "\t12");
    }

    #[test]
    fn worker_id_honors_width_and_fill() {
        assert_eq!(format!("[{:<4}]", WorkerId(1)), "[1   ]");
        assert_eq!(format!("[{:>3}]", WorkerId(12)), "[ 12]");
        assert_eq!(format!("[{:0>3}]", WorkerId(7)), "[007]");
    }

    #[test]
    fn report_totals_and_serializes_mode_name() {
        let now = Utc::now();
        let report = RunReport {
            job_id: Uuid::new_v4(),
            mode: Mode::Guarded,
            workers: vec![
                WorkerReport {
                    worker: WorkerId(1),
                    lines: 2,
                },
                WorkerReport {
                    worker: WorkerId(2),
                    lines: 3,
                },
            ],
            started_at: now,
            finished_at: now,
        };
        assert_eq!(report.total_lines(), 5);
        assert_eq!(report.duration_ms(), 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "mutex");
        assert_eq!(json["workers"][1]["lines"], 3);
    }
}
