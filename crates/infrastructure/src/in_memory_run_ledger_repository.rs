use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ledger_application::{
    RunCompletion, RunInsertOutcome, RunListQuery, RunRepository, StepRepository,
};
use ledger_core::{AppResult, RunId};
use ledger_domain::{NewRunStep, Run, RunStep, TerminalOutcome};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct LedgerState {
    runs: HashMap<RunId, Run>,
    runs_by_event_id: HashMap<String, RunId>,
    steps: Vec<RunStep>,
    last_step_at: Option<DateTime<Utc>>,
}

/// In-memory run ledger for local development and tests.
///
/// Steps referencing unknown runs are accepted.
#[derive(Debug, Default)]
pub struct InMemoryRunLedgerRepository {
    state: RwLock<LedgerState>,
}

impl InMemoryRunLedgerRepository {
    /// Creates an empty in-memory ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RunRepository for InMemoryRunLedgerRepository {
    async fn find_run_by_event_id(&self, event_id: &str) -> AppResult<Option<Run>> {
        let state = self.state.read().await;
        Ok(state
            .runs_by_event_id
            .get(event_id)
            .and_then(|run_id| state.runs.get(run_id))
            .cloned())
    }

    async fn insert_run_if_absent(&self, run: Run) -> AppResult<RunInsertOutcome> {
        let mut state = self.state.write().await;

        if let Some(existing) = state
            .runs_by_event_id
            .get(run.event_id().as_str())
            .and_then(|run_id| state.runs.get(run_id))
        {
            return Ok(RunInsertOutcome::AlreadyExists(existing.clone()));
        }

        state
            .runs_by_event_id
            .insert(run.event_id().as_str().to_owned(), run.run_id());
        state.runs.insert(run.run_id(), run.clone());
        Ok(RunInsertOutcome::Created(run))
    }

    async fn complete_run(
        &self,
        run_id: RunId,
        outcome: &TerminalOutcome,
        finished_at: DateTime<Utc>,
    ) -> AppResult<RunCompletion> {
        let mut state = self.state.write().await;
        let Some(stored) = state.runs.get_mut(&run_id) else {
            return Ok(RunCompletion::NotFound);
        };

        if stored.status().is_terminal() {
            return Ok(RunCompletion::AlreadyTerminal(stored.clone()));
        }

        *stored = stored.finish(outcome, finished_at)?;
        Ok(RunCompletion::Applied(stored.clone()))
    }

    async fn find_run(&self, run_id: RunId) -> AppResult<Option<Run>> {
        Ok(self.state.read().await.runs.get(&run_id).cloned())
    }

    async fn list_runs(&self, query: RunListQuery) -> AppResult<Vec<Run>> {
        let state = self.state.read().await;
        let mut runs: Vec<&Run> = state
            .runs
            .values()
            .filter(|run| query.status.is_none_or(|status| run.status() == status))
            .collect();
        runs.sort_by(|left, right| {
            right
                .started_at()
                .cmp(&left.started_at())
                .then_with(|| left.run_id().cmp(&right.run_id()))
        });

        Ok(runs
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StepRepository for InMemoryRunLedgerRepository {
    async fn append_step(&self, step: NewRunStep) -> AppResult<RunStep> {
        let mut state = self.state.write().await;

        let id = state.steps.last().map_or(1, |last| last.id + 1);
        let now = Utc::now();
        let created_at = state.last_step_at.map_or(now, |last| last.max(now));
        state.last_step_at = Some(created_at);

        let recorded = RunStep::recorded(step, id, created_at);
        state.steps.push(recorded.clone());
        Ok(recorded)
    }

    async fn list_steps(&self, run_id: RunId) -> AppResult<Vec<RunStep>> {
        // Appends are serialized, so storage order is already (created_at, id).
        Ok(self
            .state
            .read()
            .await
            .steps
            .iter()
            .filter(|step| step.run_id == run_id)
            .cloned()
            .collect())
    }
}
