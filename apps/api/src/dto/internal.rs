use ledger_application::{ApplyTerminalStatusInput, RecordStepInput};
use ledger_core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Step outcome reported by a provisioning action.
///
/// Every field is loosely typed on the wire so that validation can name the
/// missing or mistyped one. `input` and `output` may be JSON values or strings
/// holding JSON text.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/record-step-request.ts"
)]
pub struct RecordStepRequest {
    #[ts(type = "string | null")]
    pub run_id: Option<Value>,
    #[ts(type = "string | null")]
    pub step: Option<Value>,
    #[ts(type = "string | null")]
    pub status: Option<Value>,
    #[ts(type = "string | null")]
    pub reason: Option<Value>,
    #[ts(type = "unknown")]
    pub input: Option<Value>,
    #[ts(type = "unknown")]
    pub output: Option<Value>,
}

impl TryFrom<RecordStepRequest> for RecordStepInput {
    type Error = AppError;

    fn try_from(value: RecordStepRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            run_id: text_field(value.run_id, "run_id")?,
            step: text_field(value.step, "step")?,
            status: text_field(value.status, "status")?,
            reason: text_field(value.reason, "reason")?,
            input: value.input,
            output: value.output,
        })
    }
}

/// Acknowledgement of a recorded step.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/record-step-response.ts"
)]
pub struct RecordStepResponse {
    pub ok: bool,
    #[ts(type = "number")]
    pub step_id: i64,
}

/// Terminal status reported out-of-band by the orchestration engine.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/finish-run-request.ts"
)]
pub struct FinishRunRequest {
    #[ts(type = "string | null")]
    pub run_id: Option<Value>,
    #[ts(type = "string | null")]
    pub status: Option<Value>,
    #[ts(type = "string | null")]
    pub summary: Option<Value>,
    #[ts(type = "unknown | null")]
    pub anomalies: Option<Value>,
}

impl TryFrom<FinishRunRequest> for ApplyTerminalStatusInput {
    type Error = AppError;

    fn try_from(value: FinishRunRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            run_id: text_field(value.run_id, "run_id")?,
            status: text_field(value.status, "status")?,
            summary: text_field(value.summary, "summary")?,
            anomalies: value.anomalies,
        })
    }
}

/// Acknowledgement of a terminal status; `applied` is false for an identical repeat.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/finish-run-response.ts"
)]
pub struct FinishRunResponse {
    pub ok: bool,
    pub applied: bool,
}

/// Reads an optional text field; any other JSON type is rejected by name.
fn text_field(value: Option<Value>, field: &str) -> Result<Option<String>, AppError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(AppError::Validation(format!("field '{field}' must be a string"))),
    }
}
