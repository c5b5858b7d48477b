use std::sync::Arc;

use ledger_application::{RunLifecycleService, RunViewService, StepRecorderService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub run_lifecycle_service: RunLifecycleService,
    pub step_recorder_service: StepRecorderService,
    pub run_view_service: RunViewService,
    pub internal_api_key: Arc<str>,
}
