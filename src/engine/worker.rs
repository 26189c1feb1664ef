//! Worker loop: pull a line, tag it, push it, pause, repeat until end-of-input.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::{debug, error, trace};

use crate::error::Result;
use crate::model::{State, WorkerId, WorkerReport, tag_line};
use crate::stream::{LineSink, LineSource};
use crate::telemetry::work::{record_state_transition, start_worker_span};

use super::jitter::Jitter;

/// Everything one worker thread needs. Borrowed from the dispatcher for the
/// lifetime of the thread scope.
pub(crate) struct Worker<'a, S, W> {
    pub(crate) id: WorkerId,
    pub(crate) source: &'a S,
    pub(crate) sink: &'a W,
    /// Present only in guarded mode.
    pub(crate) lock: Option<&'a Mutex<()>>,
    pub(crate) jitter: &'a Jitter,
    /// Raised by any worker that hits a fatal error.
    pub(crate) halt: &'a AtomicBool,
}

/// Outcome of one read-then-write step.
enum Step {
    Wrote,
    Exhausted,
    /// Another worker failed; nothing was read.
    Halted,
}

/// Raises the halt flag if dropped while the thread is unwinding.
struct HaltOnPanic<'a>(&'a AtomicBool);

impl Drop for HaltOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.store(true, Ordering::Release);
        }
    }
}

impl<S: LineSource, W: LineSink> Worker<'_, S, W> {
    pub(crate) fn run(self) -> Result<WorkerReport> {
        let span = start_worker_span(self.id);
        let _enter = span.enter();

        let mut state = State::Running;
        let mut lines = 0u64;

        while !state.is_terminal() {
            match self.step() {
                Ok(Step::Wrote) => {
                    lines += 1;
                    self.jitter.pause();
                }
                Ok(Step::Exhausted) => {
                    debug_assert!(state.can_transition_to(State::Done));
                    record_state_transition(&span, state, State::Done);
                    state = State::Done;
                }
                Ok(Step::Halted) => {
                    debug!("halting after another worker failed");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "worker failed");
                    return Err(e);
                }
            }
        }

        Ok(WorkerReport {
            worker: self.id,
            lines,
        })
    }

    /// Read one line and write its tagged form. In guarded mode the lock is
    /// held across both, and released before the caller pauses.
    ///
    /// The halt flag is checked and, on failure, raised while the lock is
    /// still held, so no guarded worker reads past a fatal error.
    fn step(&self) -> Result<Step> {
        let _held = self.lock.map(|lock| lock.lock());
        // Declared after the guard so it runs before the lock is released.
        let _halt_on_panic = HaltOnPanic(self.halt);

        if self.halt.load(Ordering::Acquire) {
            return Ok(Step::Halted);
        }

        self.transfer()
            .inspect_err(|_| self.halt.store(true, Ordering::Release))
    }

    fn transfer(&self) -> Result<Step> {
        match self.source.next_line()? {
            None => Ok(Step::Exhausted),
            Some(line) => {
                self.sink.append_line(&tag_line(&line, self.id))?;
                trace!(line = %line, "line processed");
                Ok(Step::Wrote)
            }
        }
    }
}
