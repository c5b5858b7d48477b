use ledger_core::RunId;
use ledger_domain::{Run, RunEvidence, RunOutcome, RunStatus, RunStep};
use serde_json::Value;

/// Result returned to the caller that submitted an offer-signed event.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitEventResult {
    /// Run tracking the event.
    pub run_id: RunId,
    /// Run status after submission.
    pub status: RunStatus,
    /// Outcome summary, once terminal.
    pub summary: Option<String>,
    /// Anomaly detail, once terminal.
    pub anomalies: Option<Value>,
    /// Whether the event id had already been seen.
    pub deduped: bool,
}

impl SubmitEventResult {
    pub(crate) fn from_run(run: &Run, deduped: bool) -> Self {
        Self {
            run_id: run.run_id(),
            status: run.status(),
            summary: run.summary().map(ToOwned::to_owned),
            anomalies: run.anomalies().cloned(),
            deduped,
        }
    }
}

/// Input payload reported by the engine to finish a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyTerminalStatusInput {
    /// Run identifier, as sent by the caller.
    pub run_id: Option<String>,
    /// Terminal status name, as sent by the caller.
    pub status: Option<String>,
    /// Optional outcome summary.
    pub summary: Option<String>,
    /// Optional anomaly detail.
    pub anomalies: Option<Value>,
}

/// Result of a terminal status report.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalStatusApplied {
    /// Run after the report.
    pub run: Run,
    /// False when the identical outcome was already recorded.
    pub applied: bool,
}

/// Input payload reported by the engine for one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStepInput {
    /// Run identifier, as sent by the caller.
    pub run_id: Option<String>,
    /// Step name.
    pub step: Option<String>,
    /// Step status name.
    pub status: Option<String>,
    /// Optional failure or skip reason.
    pub reason: Option<String>,
    /// Step input, structured or text.
    pub input: Option<Value>,
    /// Step output, structured or text.
    pub output: Option<Value>,
}

/// Run listing filter and page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunListQuery {
    /// Optional status filter.
    pub status: Option<RunStatus>,
    /// Maximum number of runs returned.
    pub limit: usize,
    /// Number of runs skipped.
    pub offset: usize,
}

/// A run with its ordered audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct RunView {
    /// Run record.
    pub run: Run,
    /// Steps ordered by `created_at`, then `id`.
    pub steps: Vec<RunStep>,
}

/// Evidence and outcome summary for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunEvidenceView {
    /// Run record.
    pub run: Run,
    /// Latest provisioning outputs.
    pub evidence: RunEvidence,
    /// Completion flags and status label.
    pub outcome: RunOutcome,
}
