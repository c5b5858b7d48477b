use std::sync::Arc;

use ledger_core::{AppResult, CallerIdentity, NonEmptyString, RunId};
use ledger_domain::{NewRunStep, RunStep, StepPayload, StepStatus};

use crate::input_fields::required_field;
use crate::ledger_ports::{RecordStepInput, StepRepository};

/// Appends engine-reported steps to a run's audit trail.
#[derive(Clone)]
pub struct StepRecorderService {
    step_repository: Arc<dyn StepRepository>,
}

impl StepRecorderService {
    /// Creates a step recorder.
    #[must_use]
    pub fn new(step_repository: Arc<dyn StepRepository>) -> Self {
        Self { step_repository }
    }

    /// Records one step. Never touches the owning run's status.
    pub async fn record_step(
        &self,
        caller: &CallerIdentity,
        input: RecordStepInput,
    ) -> AppResult<RunStep> {
        caller.require_internal()?;

        let run_id = RunId::parse(&required_field(input.run_id, "run_id")?)?;
        let step = NonEmptyString::new(required_field(input.step, "step")?)?;
        let status = StepStatus::parse(&required_field(input.status, "status")?)?;
        let reason = input
            .reason
            .map(|reason| reason.trim().to_owned())
            .filter(|reason| !reason.is_empty());

        if status != StepStatus::Success && reason.is_none() {
            tracing::warn!(
                run_id = %run_id,
                step = step.as_str(),
                status = status.as_str(),
                "step recorded without a reason"
            );
        }

        let recorded = self
            .step_repository
            .append_step(NewRunStep {
                run_id,
                step,
                status,
                reason,
                input: StepPayload::from_caller_value(input.input),
                output: StepPayload::from_caller_value(input.output),
            })
            .await?;

        tracing::info!(
            run_id = %recorded.run_id,
            step = recorded.step.as_str(),
            status = recorded.status.as_str(),
            step_id = recorded.id,
            "step recorded"
        );

        Ok(recorded)
    }
}
