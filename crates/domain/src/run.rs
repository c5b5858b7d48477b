use chrono::{DateTime, Utc};
use ledger_core::{AppError, AppResult, NonEmptyString, RunId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of one onboarding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Run was created and the orchestration engine has not reported an outcome yet.
    Running,
    /// Every provisioning action completed.
    Success,
    /// Some provisioning actions completed and at least one failed.
    Partial,
    /// The run could not be completed.
    Failed,
    /// The run stopped because a human has to review it.
    Flagged,
}

impl RunStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::Partial => "PARTIAL",
            Self::Failed => "FAILED",
            Self::Flagged => "FLAGGED",
        }
    }

    /// Parses storage or transport value, ignoring ASCII case.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "RUNNING" => Ok(Self::Running),
            "SUCCESS" => Ok(Self::Success),
            "PARTIAL" => Ok(Self::Partial),
            "FAILED" => Ok(Self::Failed),
            "FLAGGED" => Ok(Self::Flagged),
            _ => Err(AppError::Validation(format!("unknown run status '{value}'"))),
        }
    }

    /// Returns whether the status ends the run lifecycle.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Returns the reviewer-facing label for the status.
    #[must_use]
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Running => "In progress",
            Self::Success => "Onboarding completed automatically",
            Self::Partial => "Partially completed",
            Self::Failed => "Failed",
            Self::Flagged => "Human review required",
        }
    }
}

/// Terminal values applied to a run exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalOutcome {
    status: RunStatus,
    summary: Option<String>,
    anomalies: Option<Value>,
}

impl TerminalOutcome {
    /// Creates a terminal outcome, rejecting non-terminal statuses.
    pub fn new(
        status: RunStatus,
        summary: Option<String>,
        anomalies: Option<Value>,
    ) -> AppResult<Self> {
        if !status.is_terminal() {
            return Err(AppError::Validation(format!(
                "status '{}' is not a terminal run status",
                status.as_str()
            )));
        }

        Ok(Self {
            status,
            summary,
            anomalies: anomalies.filter(|value| !value.is_null()),
        })
    }

    /// Returns terminal status.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Returns optional outcome summary.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Returns optional anomaly detail.
    #[must_use]
    pub fn anomalies(&self) -> Option<&Value> {
        self.anomalies.as_ref()
    }

    /// Returns whether a run already carries exactly these terminal values.
    #[must_use]
    pub fn is_recorded_on(&self, run: &Run) -> bool {
        run.status == self.status
            && run.summary.as_deref() == self.summary.as_deref()
            && run.anomalies.as_ref() == self.anomalies.as_ref()
    }
}

/// One tracked attempt to process a business event.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    run_id: RunId,
    event_id: NonEmptyString,
    status: RunStatus,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    input: Value,
    summary: Option<String>,
    anomalies: Option<Value>,
}

/// Raw run values read back from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecordInput {
    /// Run identifier.
    pub run_id: RunId,
    /// Deduplication key of the triggering event.
    pub event_id: String,
    /// Lifecycle status.
    pub status: RunStatus,
    /// Creation timestamp.
    pub started_at: DateTime<Utc>,
    /// Terminal timestamp.
    pub finished_at: Option<DateTime<Utc>>,
    /// Event payload plus run id.
    pub input: Value,
    /// Outcome summary.
    pub summary: Option<String>,
    /// Anomaly detail.
    pub anomalies: Option<Value>,
}

impl Run {
    /// Creates a new run in `RUNNING` state.
    #[must_use]
    pub fn start(
        run_id: RunId,
        event_id: NonEmptyString,
        input: Value,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            event_id,
            status: RunStatus::Running,
            started_at,
            finished_at: None,
            input,
            summary: None,
            anomalies: None,
        }
    }

    /// Rebuilds a run from stored values, checking lifecycle invariants.
    pub fn from_record(record: RunRecordInput) -> AppResult<Self> {
        let RunRecordInput {
            run_id,
            event_id,
            status,
            started_at,
            finished_at,
            input,
            summary,
            anomalies,
        } = record;

        if status.is_terminal() != finished_at.is_some() {
            return Err(AppError::Internal(format!(
                "run '{run_id}' has status '{}' but finished_at is {}",
                status.as_str(),
                if finished_at.is_some() { "set" } else { "unset" }
            )));
        }

        Ok(Self {
            run_id,
            event_id: NonEmptyString::new(event_id)?,
            status,
            started_at,
            finished_at,
            input,
            summary,
            anomalies: anomalies.filter(|value| !value.is_null()),
        })
    }

    /// Returns a copy of this running run carrying the terminal outcome.
    pub fn finish(&self, outcome: &TerminalOutcome, finished_at: DateTime<Utc>) -> AppResult<Self> {
        if self.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "run '{}' already finished with status '{}'",
                self.run_id,
                self.status.as_str()
            )));
        }

        Ok(Self {
            status: outcome.status,
            finished_at: Some(finished_at),
            summary: outcome.summary.clone(),
            anomalies: outcome.anomalies.clone(),
            ..self.clone()
        })
    }

    /// Returns run identifier.
    #[must_use]
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns the deduplication key.
    #[must_use]
    pub fn event_id(&self) -> &NonEmptyString {
        &self.event_id
    }

    /// Returns lifecycle status.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Returns creation timestamp.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns terminal timestamp, unset while running.
    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Returns stored event payload.
    #[must_use]
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Returns outcome summary.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Returns anomaly detail.
    #[must_use]
    pub fn anomalies(&self) -> Option<&Value> {
        self.anomalies.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use ledger_core::{AppError, NonEmptyString, RunId};
    use serde_json::json;

    use super::{Run, RunRecordInput, RunStatus, TerminalOutcome};

    fn running_run() -> Run {
        let event_id = NonEmptyString::new("evt_1").unwrap_or_else(|_| unreachable!());
        Run::start(RunId::new(), event_id, json!({"event_id": "evt_1"}), Utc::now())
    }

    #[test]
    fn status_parse_ignores_case() {
        assert!(matches!(RunStatus::parse("flagged"), Ok(RunStatus::Flagged)));
        assert!(RunStatus::parse("DONE").is_err());
    }

    #[test]
    fn terminal_outcome_rejects_running() {
        let outcome = TerminalOutcome::new(RunStatus::Running, None, None);
        assert!(matches!(outcome, Err(AppError::Validation(_))));
    }

    #[test]
    fn finish_sets_finished_at_once() {
        let run = running_run();
        assert!(run.finished_at().is_none());

        let outcome = TerminalOutcome::new(RunStatus::Success, Some("done".to_owned()), None)
            .unwrap_or_else(|_| unreachable!());
        let finished = run.finish(&outcome, Utc::now());
        assert!(finished.is_ok());
        let finished = finished.unwrap_or_else(|_| unreachable!());
        assert_eq!(finished.status(), RunStatus::Success);
        assert!(finished.finished_at().is_some());
        assert!(outcome.is_recorded_on(&finished));

        let again = finished.finish(&outcome, Utc::now());
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[test]
    fn from_record_rejects_terminal_run_without_finished_at() {
        let record = RunRecordInput {
            run_id: RunId::new(),
            event_id: "evt_2".to_owned(),
            status: RunStatus::Failed,
            started_at: Utc::now(),
            finished_at: None,
            input: json!({}),
            summary: None,
            anomalies: None,
        };

        assert!(matches!(Run::from_record(record), Err(AppError::Internal(_))));
    }

    #[test]
    fn null_anomalies_are_normalized_to_absent() {
        let outcome = TerminalOutcome::new(RunStatus::Flagged, None, Some(serde_json::Value::Null))
            .unwrap_or_else(|_| unreachable!());
        assert!(outcome.anomalies().is_none());
    }
}
