use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledger_core::{AppResult, RunId};
use ledger_domain::{NewRunStep, Run, RunStep, TerminalOutcome};

use super::records::RunListQuery;

/// Result of the conditional run insert.
#[derive(Debug, Clone, PartialEq)]
pub enum RunInsertOutcome {
    /// The run was inserted.
    Created(Run),
    /// A run with the same event id already exists and is returned unchanged.
    AlreadyExists(Run),
}

/// Result of the guarded `RUNNING` to terminal transition.
#[derive(Debug, Clone, PartialEq)]
pub enum RunCompletion {
    /// The run was running and now carries the terminal outcome.
    Applied(Run),
    /// The run was already terminal; the stored run is returned unchanged.
    AlreadyTerminal(Run),
    /// No run exists with the requested id.
    NotFound,
}

/// Repository port for run records. Owns the event id uniqueness invariant.
#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Returns the run created for an event id.
    async fn find_run_by_event_id(&self, event_id: &str) -> AppResult<Option<Run>>;

    /// Inserts a running run unless one already exists for its event id.
    ///
    /// Implementations must decide atomically, so concurrent inserts for the
    /// same event id yield exactly one `Created`. Failures unrelated to the
    /// uniqueness constraint are returned as errors.
    async fn insert_run_if_absent(&self, run: Run) -> AppResult<RunInsertOutcome>;

    /// Applies a terminal outcome if, and only if, the run is still running.
    async fn complete_run(
        &self,
        run_id: RunId,
        outcome: &TerminalOutcome,
        finished_at: DateTime<Utc>,
    ) -> AppResult<RunCompletion>;

    /// Returns one run by id.
    async fn find_run(&self, run_id: RunId) -> AppResult<Option<Run>>;

    /// Lists runs, most recently started first.
    async fn list_runs(&self, query: RunListQuery) -> AppResult<Vec<Run>>;
}

/// Repository port for the append-only step audit trail.
#[async_trait]
pub trait StepRepository: Send + Sync {
    /// Appends one step and returns it with store-assigned id and timestamp.
    async fn append_step(&self, step: NewRunStep) -> AppResult<RunStep>;

    /// Lists steps of one run ordered by `created_at`, then `id`.
    async fn list_steps(&self, run_id: RunId) -> AppResult<Vec<RunStep>>;
}
