use std::sync::Arc;

use chrono::Utc;
use ledger_core::{AppError, AppResult, CallerIdentity, RunId};
use ledger_domain::{OnboardingEvent, Run, RunStatus, TerminalOutcome};
use serde_json::Value;

use crate::input_fields::required_field;
use crate::ledger_ports::{
    ApplyTerminalStatusInput, EngineForwardRequest, EngineReply, OrchestrationEngine,
    RunCompletion, RunInsertOutcome, RunRepository, SubmitEventResult, TerminalStatusApplied,
};

/// Creates runs for incoming events and applies their terminal status.
#[derive(Clone)]
pub struct RunLifecycleService {
    run_repository: Arc<dyn RunRepository>,
    engine: Arc<dyn OrchestrationEngine>,
}

impl RunLifecycleService {
    /// Creates a lifecycle service from its ports.
    #[must_use]
    pub fn new(run_repository: Arc<dyn RunRepository>, engine: Arc<dyn OrchestrationEngine>) -> Self {
        Self {
            run_repository,
            engine,
        }
    }

    /// Creates a run for a new event, or returns the run already tracking it.
    ///
    /// New runs are forwarded to the orchestration engine and finished with the
    /// status resolved from its reply. An unreachable engine never fails the call.
    pub async fn submit_event(
        &self,
        caller: &CallerIdentity,
        payload: Value,
    ) -> AppResult<SubmitEventResult> {
        let event = OnboardingEvent::from_payload(payload)?;

        if let Some(existing) = self
            .run_repository
            .find_run_by_event_id(event.event_id().as_str())
            .await?
        {
            tracing::info!(
                event_id = %event.event_id(),
                run_id = %existing.run_id(),
                caller = caller.subject(),
                "event already tracked"
            );
            return Ok(SubmitEventResult::from_run(&existing, true));
        }

        let run_id = RunId::new();
        let run = Run::start(
            run_id,
            event.event_id().clone(),
            event.with_run_id(run_id),
            Utc::now(),
        );

        let created = match self.run_repository.insert_run_if_absent(run).await? {
            RunInsertOutcome::Created(created) => created,
            RunInsertOutcome::AlreadyExists(existing) => {
                tracing::info!(
                    event_id = %event.event_id(),
                    run_id = %existing.run_id(),
                    "concurrent submission already created the run"
                );
                return Ok(SubmitEventResult::from_run(&existing, true));
            }
        };

        tracing::info!(
            event_id = %event.event_id(),
            run_id = %created.run_id(),
            caller = caller.subject(),
            "run created"
        );

        let reply = match self
            .engine
            .forward_event(EngineForwardRequest {
                run_id: created.run_id(),
                event,
            })
            .await
        {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(run_id = %created.run_id(), error = %error, "orchestration engine unreachable");
                EngineReply::unreachable()
            }
        };

        let outcome = resolve_engine_outcome(reply)?;
        let finished = match self
            .run_repository
            .complete_run(created.run_id(), &outcome, Utc::now())
            .await?
        {
            RunCompletion::Applied(run) => run,
            RunCompletion::AlreadyTerminal(run) => {
                tracing::info!(
                    run_id = %run.run_id(),
                    status = run.status().as_str(),
                    "run finished out of band, keeping stored outcome"
                );
                run
            }
            RunCompletion::NotFound => {
                return Err(AppError::Internal(format!(
                    "run '{}' disappeared before it could be finished",
                    created.run_id()
                )));
            }
        };

        tracing::info!(
            run_id = %finished.run_id(),
            status = finished.status().as_str(),
            "run finished"
        );

        Ok(SubmitEventResult::from_run(&finished, false))
    }

    /// Applies a terminal status reported by the engine.
    ///
    /// The first terminal transition wins. Repeating it with identical values
    /// succeeds without writing; any other value is a conflict.
    pub async fn apply_terminal_status(
        &self,
        caller: &CallerIdentity,
        input: ApplyTerminalStatusInput,
    ) -> AppResult<TerminalStatusApplied> {
        caller.require_internal()?;

        let run_id = RunId::parse(&required_field(input.run_id, "run_id")?)?;
        let status = RunStatus::parse(&required_field(input.status, "status")?)?;
        let outcome = TerminalOutcome::new(status, input.summary, input.anomalies)?;

        match self
            .run_repository
            .complete_run(run_id, &outcome, Utc::now())
            .await?
        {
            RunCompletion::Applied(run) => {
                tracing::info!(run_id = %run_id, status = status.as_str(), "terminal status applied");
                Ok(TerminalStatusApplied { run, applied: true })
            }
            RunCompletion::AlreadyTerminal(run) if outcome.is_recorded_on(&run) => {
                Ok(TerminalStatusApplied { run, applied: false })
            }
            RunCompletion::AlreadyTerminal(run) => {
                tracing::warn!(
                    run_id = %run_id,
                    stored_status = run.status().as_str(),
                    requested_status = status.as_str(),
                    "rejected conflicting terminal status"
                );
                Err(AppError::Conflict(format!(
                    "run '{run_id}' already finished with status '{}'",
                    run.status().as_str()
                )))
            }
            RunCompletion::NotFound => Err(AppError::NotFound(format!("run '{run_id}' not found"))),
        }
    }
}

/// Maps the engine reply onto a terminal outcome.
///
/// No status means the transport result decides. A status that is not terminal
/// finishes the run as `FAILED`.
fn resolve_engine_outcome(reply: EngineReply) -> AppResult<TerminalOutcome> {
    let EngineReply {
        transport_succeeded,
        status,
        summary,
        anomalies,
    } = reply;

    let Some(reported) = status else {
        let status = if transport_succeeded {
            RunStatus::Success
        } else {
            RunStatus::Failed
        };
        return TerminalOutcome::new(status, summary, anomalies);
    };

    match RunStatus::parse(&reported) {
        Ok(status) if status.is_terminal() => TerminalOutcome::new(status, summary, anomalies),
        _ => {
            let summary = summary.or_else(|| {
                Some(format!(
                    "Orchestration engine reported unrecognised status '{reported}'"
                ))
            });
            TerminalOutcome::new(RunStatus::Failed, summary, anomalies)
        }
    }
}
