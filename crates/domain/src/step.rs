use chrono::{DateTime, Utc};
use ledger_core::{AppError, AppResult, NonEmptyString, RunId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of one recorded step. Steps are terminal when written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    /// Action completed.
    Success,
    /// Action failed.
    Failed,
    /// Action was intentionally not executed.
    Skipped,
}

impl StepStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        }
    }

    /// Parses storage or transport value, ignoring ASCII case.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            "SKIPPED" => Ok(Self::Skipped),
            _ => Err(AppError::Validation(format!(
                "unknown step status '{value}'"
            ))),
        }
    }
}

/// Step names emitted by the onboarding workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownStep {
    /// Offer-signed event received by the engine.
    ReceiveEvent,
    /// Provisioning decision taken for the candidate.
    Decision,
    /// Work account creation.
    ProvisionAccounts,
    /// Hardware ordering.
    ProvisionHardware,
    /// Access rights configuration.
    ProvisionAccess,
    /// Workflow completion marker.
    FinishRun,
}

impl WellKnownStep {
    /// Every well-known step in workflow order.
    pub const ALL: [Self; 6] = [
        Self::ReceiveEvent,
        Self::Decision,
        Self::ProvisionAccounts,
        Self::ProvisionHardware,
        Self::ProvisionAccess,
        Self::FinishRun,
    ];

    /// Returns the wire name of the step.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReceiveEvent => "RECEIVE_EVENT",
            Self::Decision => "DECISION",
            Self::ProvisionAccounts => "PROVISION_ACCOUNTS",
            Self::ProvisionHardware => "PROVISION_HARDWARE",
            Self::ProvisionAccess => "PROVISION_ACCESS",
            Self::FinishRun => "FINISH_RUN",
        }
    }

    /// Returns the reviewer-facing label of the step.
    #[must_use]
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::ReceiveEvent => "Offer signed received",
            Self::Decision => "Required resources identified",
            Self::ProvisionAccounts => "Work account created",
            Self::ProvisionHardware => "Hardware ordered",
            Self::ProvisionAccess => "Access rights configured",
            Self::FinishRun => "Onboarding completed",
        }
    }

    /// Resolves a recorded step name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.matches(name))
    }

    /// Returns whether a recorded step name designates this step.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name.trim().eq_ignore_ascii_case(self.as_str())
    }
}

/// Returns the display label of a recorded step name.
#[must_use]
pub fn step_display_label(name: &str) -> &str {
    WellKnownStep::from_name(name)
        .map(|step| step.display_label())
        .unwrap_or(name)
}

/// Snapshot attached to a step as input or output.
#[derive(Debug, Clone, PartialEq)]
pub enum StepPayload {
    /// Nothing was supplied.
    Absent,
    /// Structured JSON value.
    Structured(Value),
    /// Text that could not be decoded as JSON, kept verbatim.
    RawText(String),
}

impl StepPayload {
    /// Marker field wrapping raw text in presentation form.
    pub const RAW_TEXT_FIELD: &'static str = "_raw";

    /// Builds a payload from a caller value, decoding serialized JSON text when possible.
    #[must_use]
    pub fn from_caller_value(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(text)) => match serde_json::from_str::<Value>(text.as_str()) {
                Ok(decoded) => Self::Structured(decoded),
                Err(_) => Self::RawText(text),
            },
            Some(value) => Self::Structured(value),
        }
    }

    /// Returns the presentation form: raw text is wrapped in a marker field.
    #[must_use]
    pub fn to_presentation(&self) -> Option<Value> {
        match self {
            Self::Absent => None,
            Self::Structured(value) => Some(value.clone()),
            Self::RawText(text) => {
                let mut map = Map::with_capacity(1);
                map.insert(Self::RAW_TEXT_FIELD.to_owned(), Value::String(text.clone()));
                Some(Value::Object(map))
            }
        }
    }

    /// Returns whether nothing was supplied.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Validated step outcome ready to be appended to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRunStep {
    /// Owning run.
    pub run_id: RunId,
    /// Step name.
    pub step: NonEmptyString,
    /// Step outcome.
    pub status: StepStatus,
    /// Optional explanation, expected when the step did not succeed.
    pub reason: Option<String>,
    /// What the action received.
    pub input: StepPayload,
    /// What the action produced.
    pub output: StepPayload,
}

/// Step outcome as stored in the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStep {
    /// Store-assigned monotonic identifier, used as ordering tiebreak.
    pub id: i64,
    /// Owning run.
    pub run_id: RunId,
    /// Step name.
    pub step: NonEmptyString,
    /// Step outcome.
    pub status: StepStatus,
    /// Optional explanation.
    pub reason: Option<String>,
    /// What the action received.
    pub input: StepPayload,
    /// What the action produced.
    pub output: StepPayload,
    /// Store-assigned recording time, the audit ordering key.
    pub created_at: DateTime<Utc>,
}

impl RunStep {
    /// Builds a stored step from an appended one.
    #[must_use]
    pub fn recorded(step: NewRunStep, id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            run_id: step.run_id,
            step: step.step,
            status: step.status,
            reason: step.reason,
            input: step.input,
            output: step.output,
            created_at,
        }
    }

    /// Returns whether this step designates the given well-known step.
    #[must_use]
    pub fn is(&self, step: WellKnownStep) -> bool {
        step.matches(self.step.as_str())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::{StepPayload, StepStatus, WellKnownStep, step_display_label};

    #[test]
    fn step_status_rejects_unknown_value() {
        assert!(matches!(StepStatus::parse("skipped"), Ok(StepStatus::Skipped)));
        assert!(StepStatus::parse("PENDING").is_err());
    }

    #[test]
    fn serialized_json_text_is_decoded() {
        let payload = StepPayload::from_caller_value(Some(json!("{\"ticket_id\":\"hw_1\"}")));
        assert_eq!(payload, StepPayload::Structured(json!({"ticket_id": "hw_1"})));
    }

    #[test]
    fn undecodable_text_is_kept_verbatim() {
        let payload = StepPayload::from_caller_value(Some(json!("vendor said: <html>502")));
        assert_eq!(
            payload,
            StepPayload::RawText("vendor said: <html>502".to_owned())
        );
        assert_eq!(
            payload.to_presentation(),
            Some(json!({"_raw": "vendor said: <html>502"}))
        );
    }

    #[test]
    fn null_is_absent() {
        assert!(StepPayload::from_caller_value(Some(serde_json::Value::Null)).is_absent());
        assert!(StepPayload::from_caller_value(None).is_absent());
        assert_eq!(StepPayload::Absent.to_presentation(), None);
    }

    #[test]
    fn serialized_null_text_is_kept_structured() {
        let payload = StepPayload::from_caller_value(Some(json!("null")));
        assert_eq!(payload, StepPayload::Structured(serde_json::Value::Null));
        assert_eq!(payload.to_presentation(), Some(serde_json::Value::Null));
    }

    #[test]
    fn non_text_values_are_kept_structured() {
        let payload = StepPayload::from_caller_value(Some(json!({"accesses": ["Email"]})));
        assert_eq!(payload, StepPayload::Structured(json!({"accesses": ["Email"]})));
    }

    #[test]
    fn well_known_names_match_case_insensitively() {
        assert_eq!(
            WellKnownStep::from_name("provision_hardware"),
            Some(WellKnownStep::ProvisionHardware)
        );
        assert_eq!(step_display_label("finish_run"), "Onboarding completed");
        assert_eq!(step_display_label("CUSTOM_STEP"), "CUSTOM_STEP");
    }

    proptest! {
        #[test]
        fn caller_text_is_never_lost(text in ".*") {
            let payload = StepPayload::from_caller_value(Some(serde_json::Value::String(text.clone())));
            let decoded = serde_json::from_str::<serde_json::Value>(text.as_str());

            match payload {
                StepPayload::RawText(raw) => {
                    prop_assert!(decoded.is_err());
                    prop_assert_eq!(raw, text);
                }
                StepPayload::Structured(value) => prop_assert_eq!(Some(value), decoded.ok()),
                StepPayload::Absent => prop_assert!(false, "caller text {:?} was dropped", text),
            }
        }
    }
}
