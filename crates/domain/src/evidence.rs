use crate::run::Run;
use crate::step::{RunStep, StepPayload, StepStatus, WellKnownStep};

/// Provisioning outputs surfaced to a reviewer. `None` means the step never ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunEvidence {
    /// Output of the latest account provisioning step.
    pub accounts: Option<StepPayload>,
    /// Output of the latest hardware provisioning step.
    pub hardware: Option<StepPayload>,
    /// Output of the latest access provisioning step.
    pub access: Option<StepPayload>,
}

/// Reviewer-facing summary of what the system completed for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Whether the latest account provisioning step succeeded.
    pub account_completed: bool,
    /// Whether the latest hardware provisioning step succeeded.
    pub hardware_completed: bool,
    /// Whether the latest access provisioning step succeeded.
    pub access_completed: bool,
    /// Label of the run status.
    pub status_label: &'static str,
}

/// Returns the most recent step with the given name. `steps` must be in audit order.
#[must_use]
pub fn latest_step(steps: &[RunStep], step: WellKnownStep) -> Option<&RunStep> {
    steps.iter().rev().find(|candidate| candidate.is(step))
}

/// Extracts provisioning outputs from steps in audit order.
#[must_use]
pub fn derive_evidence(steps: &[RunStep]) -> RunEvidence {
    let output_of = |step| latest_step(steps, step).map(|found| found.output.clone());

    RunEvidence {
        accounts: output_of(WellKnownStep::ProvisionAccounts),
        hardware: output_of(WellKnownStep::ProvisionHardware),
        access: output_of(WellKnownStep::ProvisionAccess),
    }
}

/// Summarizes which provisioning actions completed for a run.
#[must_use]
pub fn derive_outcome(run: &Run, steps: &[RunStep]) -> RunOutcome {
    let succeeded = |step| {
        latest_step(steps, step).is_some_and(|found| found.status == StepStatus::Success)
    };

    RunOutcome {
        account_completed: succeeded(WellKnownStep::ProvisionAccounts),
        hardware_completed: succeeded(WellKnownStep::ProvisionHardware),
        access_completed: succeeded(WellKnownStep::ProvisionAccess),
        status_label: run.status().display_label(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use ledger_core::{NonEmptyString, RunId};
    use proptest::prelude::*;
    use serde_json::json;

    use super::{derive_evidence, derive_outcome, latest_step};
    use crate::run::Run;
    use crate::step::{RunStep, StepPayload, StepStatus, WellKnownStep};

    fn step(run_id: RunId, id: i64, name: &str, status: StepStatus, output: StepPayload) -> RunStep {
        RunStep {
            id,
            run_id,
            step: NonEmptyString::new(name).unwrap_or_else(|_| unreachable!()),
            status,
            reason: None,
            input: StepPayload::Absent,
            output,
            created_at: Utc::now() + Duration::milliseconds(id),
        }
    }

    #[test]
    fn missing_hardware_step_yields_absent_evidence() {
        let run_id = RunId::new();
        let steps = vec![
            step(run_id, 1, "RECEIVE_EVENT", StepStatus::Success, StepPayload::Absent),
            step(
                run_id,
                2,
                "PROVISION_ACCOUNTS",
                StepStatus::Success,
                StepPayload::Structured(json!({"account": {"username": "ana.lopez"}})),
            ),
        ];

        let evidence = derive_evidence(&steps);
        assert!(evidence.hardware.is_none());
        assert!(evidence.access.is_none());
        assert_eq!(
            evidence.accounts,
            Some(StepPayload::Structured(json!({"account": {"username": "ana.lopez"}})))
        );
    }

    #[test]
    fn latest_matching_step_wins_and_names_ignore_case() {
        let run_id = RunId::new();
        let steps = vec![
            step(
                run_id,
                1,
                "PROVISION_HARDWARE",
                StepStatus::Failed,
                StepPayload::RawText("timeout".to_owned()),
            ),
            step(
                run_id,
                2,
                "provision_hardware",
                StepStatus::Success,
                StepPayload::Structured(json!({"bundle": "MacBook Pro"})),
            ),
        ];

        let evidence = derive_evidence(&steps);
        assert_eq!(
            evidence.hardware,
            Some(StepPayload::Structured(json!({"bundle": "MacBook Pro"})))
        );
    }

    #[test]
    fn outcome_reflects_latest_step_status() {
        let run_id = RunId::new();
        let event_id = NonEmptyString::new("evt_9").unwrap_or_else(|_| unreachable!());
        let run = Run::start(run_id, event_id, json!({}), Utc::now());
        let steps = vec![
            step(run_id, 1, "PROVISION_ACCOUNTS", StepStatus::Success, StepPayload::Absent),
            step(run_id, 2, "PROVISION_HARDWARE", StepStatus::Failed, StepPayload::Absent),
            step(run_id, 3, "PROVISION_ACCESS", StepStatus::Skipped, StepPayload::Absent),
        ];

        let outcome = derive_outcome(&run, &steps);
        assert!(outcome.account_completed);
        assert!(!outcome.hardware_completed);
        assert!(!outcome.access_completed);
        assert_eq!(outcome.status_label, "In progress");
    }

    proptest! {
        #[test]
        fn latest_step_is_last_in_audit_order(statuses in proptest::collection::vec(0_u8..3, 1..12)) {
            let run_id = RunId::new();
            let steps: Vec<RunStep> = statuses
                .iter()
                .enumerate()
                .map(|(index, code)| {
                    let status = match code {
                        0 => StepStatus::Success,
                        1 => StepStatus::Failed,
                        _ => StepStatus::Skipped,
                    };
                    step(run_id, index as i64 + 1, "PROVISION_ACCESS", status, StepPayload::Absent)
                })
                .collect();

            let found = latest_step(&steps, WellKnownStep::ProvisionAccess);
            prop_assert_eq!(found.map(|value| value.id), Some(steps.len() as i64));
        }
    }
}
