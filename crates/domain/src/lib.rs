//! Domain entities and invariants of the onboarding run ledger.

#![forbid(unsafe_code)]

mod event;
mod evidence;
mod provisioning;
mod run;
mod step;

pub use event::{Candidate, Employment, Job, OnboardingEvent, REQUIRED_EVENT_FIELDS, Scenario};
pub use evidence::{RunEvidence, RunOutcome, derive_evidence, derive_outcome, latest_step};
pub use provisioning::{
    HARDWARE_VENDOR_TIMEOUT, access_configured, access_policy, account_provisioned,
    account_username, action_reference, hardware_bundle, hardware_order_failed, hardware_ordered,
};
pub use run::{Run, RunRecordInput, RunStatus, TerminalOutcome};
pub use step::{NewRunStep, RunStep, StepPayload, StepStatus, WellKnownStep, step_display_label};
