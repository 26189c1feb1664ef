//! Job and worker span helpers.
//!
//! Provides span creation and state-transition recording for jobs and the
//! workers that drain them.

use tracing::Span;
use uuid::Uuid;

use crate::model::{Mode, State, WorkerId};

/// Start a span covering one whole job run.
pub fn start_job_span(job_id: &Uuid, mode: Mode, workers: usize) -> Span {
    tracing::info_span!(
        "job.run",
        "job.id" = %job_id,
        "job.mode" = %mode,
        "job.workers" = workers,
    )
}

/// Start a span for a single worker loop.
///
/// The `worker.state` field is declared empty and filled in by
/// [`record_state_transition`].
pub fn start_worker_span(worker: WorkerId) -> Span {
    tracing::info_span!(
        "worker.run",
        "worker.id" = %worker,
        "worker.state" = tracing::field::Empty,
    )
}

/// Record a worker state transition on the given span.
pub fn record_state_transition(span: &Span, from: State, to: State) {
    span.record("worker.state", tracing::field::display(to));
    span.in_scope(|| {
        tracing::info!(%from, %to, "state_transition");
    });
}
