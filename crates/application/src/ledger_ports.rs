mod engine;
mod records;
mod repository;

pub use engine::{EngineForwardRequest, EngineReply, OrchestrationEngine};
pub use records::{
    ApplyTerminalStatusInput, RecordStepInput, RunEvidenceView, RunListQuery, RunView,
    SubmitEventResult, TerminalStatusApplied,
};
pub use repository::{RunCompletion, RunInsertOutcome, RunRepository, StepRepository};
