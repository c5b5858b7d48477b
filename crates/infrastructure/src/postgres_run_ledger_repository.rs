use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledger_application::{
    RunCompletion, RunInsertOutcome, RunListQuery, RunRepository, StepRepository,
};
use ledger_core::{AppError, AppResult, NonEmptyString, RunId};
use ledger_domain::{
    NewRunStep, Run, RunRecordInput, RunStatus, RunStep, StepPayload, StepStatus, TerminalOutcome,
};
use serde_json::Value;
use sqlx::{FromRow, PgPool};

mod runs;
mod steps;

/// PostgreSQL-backed run ledger. Owns both the `runs` and `run_steps` tables.
#[derive(Clone)]
pub struct PostgresRunLedgerRepository {
    pool: PgPool,
}

impl PostgresRunLedgerRepository {
    /// Creates a run ledger repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RunRow {
    run_id: uuid::Uuid,
    event_id: String,
    status: String,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    input: Value,
    summary: Option<String>,
    anomalies: Option<Value>,
}

#[derive(Debug, FromRow)]
struct RunStepRow {
    id: i64,
    run_id: uuid::Uuid,
    step: String,
    status: String,
    reason: Option<String>,
    input: Option<Value>,
    input_raw: Option<String>,
    output: Option<Value>,
    output_raw: Option<String>,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl RunRepository for PostgresRunLedgerRepository {
    async fn find_run_by_event_id(&self, event_id: &str) -> AppResult<Option<Run>> {
        self.find_run_by_event_id_impl(event_id).await
    }

    async fn insert_run_if_absent(&self, run: Run) -> AppResult<RunInsertOutcome> {
        self.insert_run_if_absent_impl(run).await
    }

    async fn complete_run(
        &self,
        run_id: RunId,
        outcome: &TerminalOutcome,
        finished_at: DateTime<Utc>,
    ) -> AppResult<RunCompletion> {
        self.complete_run_impl(run_id, outcome, finished_at).await
    }

    async fn find_run(&self, run_id: RunId) -> AppResult<Option<Run>> {
        self.find_run_impl(run_id).await
    }

    async fn list_runs(&self, query: RunListQuery) -> AppResult<Vec<Run>> {
        self.list_runs_impl(query).await
    }
}

#[async_trait]
impl StepRepository for PostgresRunLedgerRepository {
    async fn append_step(&self, step: NewRunStep) -> AppResult<RunStep> {
        self.append_step_impl(step).await
    }

    async fn list_steps(&self, run_id: RunId) -> AppResult<Vec<RunStep>> {
        self.list_steps_impl(run_id).await
    }
}

fn run_from_row(row: RunRow) -> AppResult<Run> {
    Run::from_record(RunRecordInput {
        run_id: RunId::from_uuid(row.run_id),
        event_id: row.event_id,
        status: RunStatus::parse(row.status.as_str())
            .map_err(|error| AppError::Internal(format!("stored run is corrupt: {error}")))?,
        started_at: row.started_at,
        finished_at: row.finished_at,
        input: row.input,
        summary: row.summary,
        anomalies: row.anomalies,
    })
}

fn run_step_from_row(row: RunStepRow) -> AppResult<RunStep> {
    let step = NonEmptyString::new(row.step).map_err(|error| {
        AppError::Internal(format!("stored step '{}' is corrupt: {error}", row.id))
    })?;
    let status = StepStatus::parse(row.status.as_str()).map_err(|error| {
        AppError::Internal(format!("stored step '{}' is corrupt: {error}", row.id))
    })?;

    Ok(RunStep {
        id: row.id,
        run_id: RunId::from_uuid(row.run_id),
        step,
        status,
        reason: row.reason,
        input: payload_from_columns(row.input, row.input_raw),
        output: payload_from_columns(row.output, row.output_raw),
        created_at: row.created_at,
    })
}

/// Splits a payload into its JSONB and raw text columns.
fn payload_columns(payload: &StepPayload) -> (Option<&Value>, Option<&str>) {
    match payload {
        StepPayload::Absent => (None, None),
        StepPayload::Structured(value) => (Some(value), None),
        StepPayload::RawText(text) => (None, Some(text.as_str())),
    }
}

fn payload_from_columns(structured: Option<Value>, raw: Option<String>) -> StepPayload {
    match (structured, raw) {
        (_, Some(text)) => StepPayload::RawText(text),
        (Some(value), None) => StepPayload::Structured(value),
        (None, None) => StepPayload::Absent,
    }
}
