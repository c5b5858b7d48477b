use std::sync::Arc;

use ledger_core::{AppError, AppResult, RunId};
use ledger_domain::{Run, RunStatus, derive_evidence, derive_outcome};

use crate::ledger_ports::{RunEvidenceView, RunListQuery, RunRepository, RunView, StepRepository};

const DEFAULT_RUN_PAGE_SIZE: usize = 50;
const MAX_RUN_PAGE_SIZE: usize = 200;

/// Read-side assembler for runs and their audit trails.
#[derive(Clone)]
pub struct RunViewService {
    run_repository: Arc<dyn RunRepository>,
    step_repository: Arc<dyn StepRepository>,
}

impl RunViewService {
    /// Creates a run view service.
    #[must_use]
    pub fn new(
        run_repository: Arc<dyn RunRepository>,
        step_repository: Arc<dyn StepRepository>,
    ) -> Self {
        Self {
            run_repository,
            step_repository,
        }
    }

    /// Returns a run with all its steps in audit order.
    pub async fn get_run(&self, run_id: &str) -> AppResult<RunView> {
        let run_id = RunId::parse(run_id)?;
        let run = self
            .run_repository
            .find_run(run_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("run '{run_id}' not found")))?;
        let steps = self.step_repository.list_steps(run_id).await?;

        Ok(RunView { run, steps })
    }

    /// Returns provisioning evidence and the outcome summary of a run.
    pub async fn run_evidence(&self, run_id: &str) -> AppResult<RunEvidenceView> {
        let RunView { run, steps } = self.get_run(run_id).await?;
        let evidence = derive_evidence(&steps);
        let outcome = derive_outcome(&run, &steps);

        Ok(RunEvidenceView {
            run,
            evidence,
            outcome,
        })
    }

    /// Lists runs, most recently started first.
    pub async fn list_runs(
        &self,
        status: Option<RunStatus>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> AppResult<Vec<Run>> {
        let query = RunListQuery {
            status,
            limit: limit
                .unwrap_or(DEFAULT_RUN_PAGE_SIZE)
                .clamp(1, MAX_RUN_PAGE_SIZE),
            offset: offset.unwrap_or(0),
        };

        self.run_repository.list_runs(query).await
    }
}
