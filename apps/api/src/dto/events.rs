use ledger_application::SubmitEventResult;
use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;

/// Outcome of an offer-signed submission.
///
/// `deduped` is only present when the event had already been processed.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-event-response.ts"
)]
pub struct SubmitEventResponse {
    pub run_id: String,
    pub status: String,
    pub summary: Option<String>,
    #[ts(type = "unknown | null")]
    pub anomalies: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub deduped: Option<bool>,
}

impl From<SubmitEventResult> for SubmitEventResponse {
    fn from(value: SubmitEventResult) -> Self {
        Self {
            run_id: value.run_id.to_string(),
            status: value.status.as_str().to_owned(),
            summary: value.summary,
            anomalies: value.anomalies,
            deduped: value.deduped.then_some(true),
        }
    }
}
