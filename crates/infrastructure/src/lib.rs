//! Infrastructure adapters for the run ledger ports.

#![forbid(unsafe_code)]

mod http_orchestration_engine;
mod in_memory_run_ledger_repository;
mod postgres_run_ledger_repository;
mod simulated_orchestration_engine;

pub use http_orchestration_engine::HttpOrchestrationEngine;
pub use in_memory_run_ledger_repository::InMemoryRunLedgerRepository;
pub use postgres_run_ledger_repository::PostgresRunLedgerRepository;
pub use simulated_orchestration_engine::SimulatedOrchestrationEngine;

/// Migrations for the run ledger schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
