use std::sync::Arc;

use ledger_application::{OrchestrationEngine, StepRecorderService};
use ledger_core::AppError;
use ledger_infrastructure::{HttpOrchestrationEngine, SimulatedOrchestrationEngine};
use tracing::info;

use crate::api_config::OrchestrationEngineConfig;

pub(super) fn build_orchestration_engine(
    config: &OrchestrationEngineConfig,
    internal_api_key: &str,
    step_recorder_service: StepRecorderService,
) -> Result<Arc<dyn OrchestrationEngine>, AppError> {
    match config {
        OrchestrationEngineConfig::Http { endpoint, timeout } => {
            let mut builder = reqwest::Client::builder();
            if let Some(timeout) = timeout {
                builder = builder.timeout(*timeout);
            }
            let http_client = builder.build().map_err(|error| {
                AppError::Internal(format!(
                    "failed to build orchestration engine client: {error}"
                ))
            })?;

            info!(%endpoint, ?timeout, "forwarding events to http orchestration engine");
            Ok(Arc::new(HttpOrchestrationEngine::new(
                http_client,
                endpoint.clone(),
                internal_api_key.to_owned(),
            )))
        }
        OrchestrationEngineConfig::Simulated => {
            info!("playing events through the simulated orchestration engine");
            Ok(Arc::new(SimulatedOrchestrationEngine::new(
                step_recorder_service,
            )))
        }
    }
}
