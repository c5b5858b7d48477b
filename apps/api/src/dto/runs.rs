use ledger_application::{RunEvidenceView, RunView};
use ledger_domain::{Run, RunStep, StepPayload, step_display_label};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Query parameters of the run list.
#[derive(Debug, Default, Deserialize)]
pub struct RunListQueryRequest {
    pub status: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// API representation of a run.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/run-response.ts"
)]
pub struct RunResponse {
    pub run_id: String,
    pub event_id: String,
    pub status: String,
    pub status_label: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    #[ts(type = "Record<string, unknown>")]
    pub input: Value,
    pub summary: Option<String>,
    #[ts(type = "unknown | null")]
    pub anomalies: Option<Value>,
}

impl From<&Run> for RunResponse {
    fn from(value: &Run) -> Self {
        Self {
            run_id: value.run_id().to_string(),
            event_id: value.event_id().as_str().to_owned(),
            status: value.status().as_str().to_owned(),
            status_label: value.status().display_label().to_owned(),
            started_at: value.started_at().to_rfc3339(),
            finished_at: value.finished_at().map(|timestamp| timestamp.to_rfc3339()),
            input: value.input().clone(),
            summary: value.summary().map(ToOwned::to_owned),
            anomalies: value.anomalies().cloned(),
        }
    }
}

/// API representation of one recorded step.
///
/// Payloads that were not valid JSON are rendered as `{"_raw": "<text>"}`.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/run-step-response.ts"
)]
pub struct RunStepResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub run_id: String,
    pub step: String,
    pub step_label: String,
    pub status: String,
    pub reason: Option<String>,
    #[ts(type = "unknown | null")]
    pub input: Option<Value>,
    #[ts(type = "unknown | null")]
    pub output: Option<Value>,
    pub created_at: String,
}

impl From<RunStep> for RunStepResponse {
    fn from(value: RunStep) -> Self {
        Self {
            id: value.id,
            run_id: value.run_id.to_string(),
            step_label: step_display_label(value.step.as_str()).to_owned(),
            step: value.step.into(),
            status: value.status.as_str().to_owned(),
            reason: value.reason,
            input: value.input.to_presentation(),
            output: value.output.to_presentation(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// A run joined with its steps in audit order.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/run-detail-response.ts"
)]
pub struct RunDetailResponse {
    pub run: RunResponse,
    pub steps: Vec<RunStepResponse>,
}

impl From<RunView> for RunDetailResponse {
    fn from(value: RunView) -> Self {
        Self {
            run: RunResponse::from(&value.run),
            steps: value
                .steps
                .into_iter()
                .map(RunStepResponse::from)
                .collect(),
        }
    }
}

/// Latest provisioning outputs of a run.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/run-evidence-items-response.ts"
)]
pub struct RunEvidenceItemsResponse {
    #[ts(type = "unknown | null")]
    pub accounts: Option<Value>,
    #[ts(type = "unknown | null")]
    pub hardware: Option<Value>,
    #[ts(type = "unknown | null")]
    pub access: Option<Value>,
}

/// Completion flags of the provisioning actions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/run-outcome-response.ts"
)]
pub struct RunOutcomeResponse {
    pub account_completed: bool,
    pub hardware_completed: bool,
    pub access_completed: bool,
    pub status_label: String,
}

/// Evidence and outcome derived from a run's steps.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/run-evidence-response.ts"
)]
pub struct RunEvidenceResponse {
    pub run_id: String,
    pub status: String,
    pub evidence: RunEvidenceItemsResponse,
    pub outcome: RunOutcomeResponse,
}

impl From<RunEvidenceView> for RunEvidenceResponse {
    fn from(value: RunEvidenceView) -> Self {
        Self {
            run_id: value.run.run_id().to_string(),
            status: value.run.status().as_str().to_owned(),
            evidence: RunEvidenceItemsResponse {
                accounts: presented(value.evidence.accounts),
                hardware: presented(value.evidence.hardware),
                access: presented(value.evidence.access),
            },
            outcome: RunOutcomeResponse {
                account_completed: value.outcome.account_completed,
                hardware_completed: value.outcome.hardware_completed,
                access_completed: value.outcome.access_completed,
                status_label: value.outcome.status_label.to_owned(),
            },
        }
    }
}

fn presented(payload: Option<StepPayload>) -> Option<Value> {
    payload.and_then(|payload| payload.to_presentation())
}
