//! Application services and ports of the onboarding run ledger.

#![forbid(unsafe_code)]

mod input_fields;
mod ledger_ports;
mod run_lifecycle_service;
mod run_view_service;
mod step_recorder_service;

pub use ledger_ports::{
    ApplyTerminalStatusInput, EngineForwardRequest, EngineReply, OrchestrationEngine,
    RecordStepInput, RunCompletion, RunEvidenceView, RunInsertOutcome, RunListQuery,
    RunRepository, RunView, StepRepository, SubmitEventResult, TerminalStatusApplied,
};
pub use run_lifecycle_service::RunLifecycleService;
pub use run_view_service::RunViewService;
pub use step_recorder_service::StepRecorderService;

#[cfg(test)]
mod test_support;
