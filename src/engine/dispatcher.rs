//! Dispatcher: spawns the worker pool for a job and waits for all of it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{RunReport, WorkerId};
use crate::stream::{LineSink, LineSource};
use crate::telemetry::work::start_job_span;

use super::jitter::Jitter;
use super::job::Job;
use super::worker::Worker;

/// Runs jobs to completion on a fresh pool of OS threads.
#[derive(Debug)]
pub struct Dispatcher {
    jitter: Jitter,
}

impl Dispatcher {
    pub fn new(jitter: Jitter) -> Self {
        Self { jitter }
    }

    /// Run `job` synchronously.
    ///
    /// Every worker is spawned before any is joined, and the call returns
    /// only after the last one has finished. The job (and with it both
    /// streams) is dropped before returning.
    ///
    /// # Errors
    ///
    /// A failed spawn wins; otherwise the error of the lowest-numbered
    /// failing worker is returned. Either way every worker that did start
    /// has been joined.
    pub fn run<S, W>(&self, job: Job<S, W>) -> Result<RunReport>
    where
        S: LineSource,
        W: LineSink,
    {
        let job_id = Uuid::new_v4();
        let mode = job.mode();
        let span = start_job_span(&job_id, mode, job.workers());
        let _enter = span.enter();

        let started_at = Utc::now();
        let mut lock = mode.is_guarded().then(|| Mutex::new(()));
        if lock.is_some() {
            debug!("shared lock created");
        }
        let halt = AtomicBool::new(false);
        let mut spawn_error = None;

        let joined = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(job.workers());

            for n in 1..=job.workers() {
                // Job guarantees the count fits in u32.
                let id = WorkerId(n as u32);
                let worker = Worker {
                    id,
                    source: job.source(),
                    sink: job.sink(),
                    lock: lock.as_ref(),
                    jitter: &self.jitter,
                    halt: &halt,
                };
                let parent = span.clone();

                let spawned = thread::Builder::new()
                    .name(format!("linepool-worker-{id}"))
                    .spawn_scoped(scope, move || parent.in_scope(|| worker.run()));

                match spawned {
                    Ok(handle) => {
                        debug!(worker = %id, "worker spawned");
                        handles.push((id, handle));
                    }
                    Err(source) => {
                        halt.store(true, Ordering::Release);
                        spawn_error = Some(Error::Spawn { worker: id, source });
                        break;
                    }
                }
            }

            handles
                .into_iter()
                .map(|(id, handle)| (id, handle.join()))
                .collect::<Vec<_>>()
        });

        let mut first_error = spawn_error;
        // Handles were pushed in id order, so reports come out sorted.
        let mut workers = Vec::with_capacity(joined.len());
        for (id, outcome) in joined {
            let failure = match outcome {
                Ok(Ok(report)) => {
                    workers.push(report);
                    continue;
                }
                Ok(Err(e)) => e,
                Err(_) => Error::WorkerPanicked { worker: id },
            };
            if first_error.is_none() {
                first_error = Some(failure);
            }
        }

        if lock.take().is_some() {
            debug!("shared lock destroyed");
        }
        drop(job);

        if let Some(e) = first_error {
            error!(error = %e, "job failed");
            return Err(e);
        }

        let report = RunReport {
            job_id,
            mode,
            workers,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            total_lines = report.total_lines(),
            duration_ms = report.duration_ms(),
            "job finished"
        );
        Ok(report)
    }
}
