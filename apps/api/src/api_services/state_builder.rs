use std::sync::Arc;

use ledger_application::{
    RunLifecycleService, RunRepository, RunViewService, StepRecorderService, StepRepository,
};
use ledger_core::AppError;
use ledger_infrastructure::{InMemoryRunLedgerRepository, PostgresRunLedgerRepository};
use tracing::warn;

use crate::api_config::{ApiConfig, LedgerStoreConfig};
use crate::state::AppState;

use super::database::connect_and_migrate;
use super::engine::build_orchestration_engine;

struct LedgerRepositories {
    runs: Arc<dyn RunRepository>,
    steps: Arc<dyn StepRepository>,
}

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let repositories = build_ledger_repositories(&config.ledger_store).await?;

    let step_recorder_service = StepRecorderService::new(repositories.steps.clone());
    let engine = build_orchestration_engine(
        &config.orchestration_engine,
        config.internal_api_key.as_str(),
        step_recorder_service.clone(),
    )?;

    Ok(AppState {
        run_lifecycle_service: RunLifecycleService::new(repositories.runs.clone(), engine),
        step_recorder_service,
        run_view_service: RunViewService::new(repositories.runs, repositories.steps),
        internal_api_key: Arc::from(config.internal_api_key.as_str()),
    })
}

async fn build_ledger_repositories(
    config: &LedgerStoreConfig,
) -> Result<LedgerRepositories, AppError> {
    match config {
        LedgerStoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = connect_and_migrate(database_url, *max_connections).await?;
            let repository = Arc::new(PostgresRunLedgerRepository::new(pool));
            Ok(LedgerRepositories {
                runs: repository.clone(),
                steps: repository,
            })
        }
        LedgerStoreConfig::Memory => {
            warn!("using the in-memory run ledger; runs are lost on restart");
            let repository = Arc::new(InMemoryRunLedgerRepository::new());
            Ok(LedgerRepositories {
                runs: repository.clone(),
                steps: repository,
            })
        }
    }
}
