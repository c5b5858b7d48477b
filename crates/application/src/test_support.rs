use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use ledger_core::{AppError, AppResult, RunId};
use ledger_domain::{NewRunStep, Run, RunStep, TerminalOutcome};

use crate::ledger_ports::{
    RunCompletion, RunInsertOutcome, RunListQuery, RunRepository, StepRepository,
};

/// Ledger fake backing both repository ports.
#[derive(Default)]
pub(crate) struct FakeLedger {
    pub(crate) runs: Mutex<Vec<Run>>,
    pub(crate) steps: Mutex<Vec<RunStep>>,
}

impl FakeLedger {
    pub(crate) async fn stored_runs(&self) -> Vec<Run> {
        self.runs.lock().await.clone()
    }
}

#[async_trait]
impl RunRepository for FakeLedger {
    async fn find_run_by_event_id(&self, event_id: &str) -> AppResult<Option<Run>> {
        Ok(self
            .runs
            .lock()
            .await
            .iter()
            .find(|run| run.event_id().as_str() == event_id)
            .cloned())
    }

    async fn insert_run_if_absent(&self, run: Run) -> AppResult<RunInsertOutcome> {
        let mut runs = self.runs.lock().await;
        if let Some(existing) = runs
            .iter()
            .find(|stored| stored.event_id() == run.event_id())
        {
            return Ok(RunInsertOutcome::AlreadyExists(existing.clone()));
        }

        runs.push(run.clone());
        Ok(RunInsertOutcome::Created(run))
    }

    async fn complete_run(
        &self,
        run_id: RunId,
        outcome: &TerminalOutcome,
        finished_at: DateTime<Utc>,
    ) -> AppResult<RunCompletion> {
        let mut runs = self.runs.lock().await;
        let Some(stored) = runs.iter_mut().find(|run| run.run_id() == run_id) else {
            return Ok(RunCompletion::NotFound);
        };

        if stored.status().is_terminal() {
            return Ok(RunCompletion::AlreadyTerminal(stored.clone()));
        }

        *stored = stored.finish(outcome, finished_at)?;
        Ok(RunCompletion::Applied(stored.clone()))
    }

    async fn find_run(&self, run_id: RunId) -> AppResult<Option<Run>> {
        Ok(self
            .runs
            .lock()
            .await
            .iter()
            .find(|run| run.run_id() == run_id)
            .cloned())
    }

    async fn list_runs(&self, query: RunListQuery) -> AppResult<Vec<Run>> {
        let mut runs: Vec<Run> = self
            .runs
            .lock()
            .await
            .iter()
            .filter(|run| query.status.is_none_or(|status| run.status() == status))
            .cloned()
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
            .collect())
    }
}

#[async_trait]
impl StepRepository for FakeLedger {
    async fn append_step(&self, step: NewRunStep) -> AppResult<RunStep> {
        let mut steps = self.steps.lock().await;
        let id = i64::try_from(steps.len())
            .map_err(|error| AppError::Internal(error.to_string()))?
            + 1;
        let recorded = RunStep::recorded(step, id, Utc::now() + Duration::microseconds(id));
        steps.push(recorded.clone());
        Ok(recorded)
    }

    async fn list_steps(&self, run_id: RunId) -> AppResult<Vec<RunStep>> {
        let mut steps: Vec<RunStep> = self
            .steps
            .lock()
            .await
            .iter()
            .filter(|step| step.run_id == run_id)
            .cloned()
            .collect();
        steps.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(steps)
    }
}

pub(crate) fn offer_signed(event_id: &str) -> Value {
    json!({
        "event_id": event_id,
        "candidate": {
            "first_name": "Ana",
            "last_name": "Lopez",
            "email": "ana.lopez@example.com"
        },
        "job": {"title": "Backend Engineer", "department": "Engineering"},
        "employment": {
            "country": "ES",
            "contract_type": "permanent",
            "start_date": "2026-11-02"
        },
        "scenario": {"standard": true}
    })
}
