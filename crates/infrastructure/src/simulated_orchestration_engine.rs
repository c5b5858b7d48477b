use async_trait::async_trait;
use ledger_application::{
    EngineForwardRequest, EngineReply, OrchestrationEngine, RecordStepInput, StepRecorderService,
};
use ledger_core::{AppResult, CallerIdentity, RunId};
use ledger_domain::{
    HARDWARE_VENDOR_TIMEOUT, OnboardingEvent, StepStatus, WellKnownStep, access_configured,
    access_policy, account_provisioned, action_reference, hardware_bundle, hardware_order_failed,
    hardware_ordered,
};
use serde_json::{Value, json};

/// In-process engine playing the demo onboarding workflow.
///
/// Steps are reported through the step recorder, exactly like an external
/// engine calling the internal API, and the outcome is returned synchronously.
pub struct SimulatedOrchestrationEngine {
    step_recorder: StepRecorderService,
    caller: CallerIdentity,
}

impl SimulatedOrchestrationEngine {
    /// Creates a simulated engine reporting through the given recorder.
    #[must_use]
    pub fn new(step_recorder: StepRecorderService) -> Self {
        Self {
            step_recorder,
            caller: CallerIdentity::internal("simulated-orchestration-engine"),
        }
    }

    async fn record(
        &self,
        run_id: RunId,
        step: WellKnownStep,
        status: StepStatus,
        reason: Option<&str>,
        input: Value,
        output: Value,
    ) -> AppResult<()> {
        self.step_recorder
            .record_step(
                &self.caller,
                RecordStepInput {
                    run_id: Some(run_id.to_string()),
                    step: Some(step.as_str().to_owned()),
                    status: Some(status.as_str().to_owned()),
                    reason: reason.map(ToOwned::to_owned),
                    input: Some(input),
                    output: Some(output),
                },
            )
            .await?;

        Ok(())
    }

    async fn play(&self, run_id: RunId, event: &OnboardingEvent) -> AppResult<EngineReply> {
        let candidate = event.candidate();
        let job = event.job();
        let employment = event.employment();
        let scenario = event.scenario();

        self.record(
            run_id,
            WellKnownStep::ReceiveEvent,
            StepStatus::Success,
            None,
            event.payload().clone(),
            json!({"event_id": event.event_id().as_str()}),
        )
        .await?;

        if scenario.unknown_role {
            self.record(
                run_id,
                WellKnownStep::Decision,
                StepStatus::Success,
                Some("Job title does not map to a known role"),
                json!({"job_title": job.title, "department": job.department}),
                json!({"decision": "FLAG", "requires_review": true}),
            )
            .await?;
            self.record(
                run_id,
                WellKnownStep::FinishRun,
                StepStatus::Success,
                None,
                Value::Null,
                json!({"status": "FLAGGED"}),
            )
            .await?;

            return Ok(EngineReply {
                transport_succeeded: true,
                status: Some("FLAGGED".to_owned()),
                summary: Some(format!(
                    "Role '{}' is ambiguous and needs human review before provisioning",
                    job.title
                )),
                anomalies: Some(json!([{"type": "UNKNOWN_ROLE", "job_title": job.title}])),
            });
        }

        self.record(
            run_id,
            WellKnownStep::Decision,
            StepStatus::Success,
            None,
            json!({"job_title": job.title, "department": job.department}),
            json!({
                "decision": "PROVISION",
                "hardware_bundle": hardware_bundle(&employment.country),
                "accesses": access_policy(&job.department),
            }),
        )
        .await?;

        self.record(
            run_id,
            WellKnownStep::ProvisionAccounts,
            StepStatus::Success,
            None,
            json!({"email": candidate.email}),
            account_provisioned(&candidate.email, &action_reference("acct")),
        )
        .await?;

        let hardware_failed = scenario.simulate_it_failure;
        if hardware_failed {
            self.record(
                run_id,
                WellKnownStep::ProvisionHardware,
                StepStatus::Failed,
                Some(HARDWARE_VENDOR_TIMEOUT),
                json!({"country": employment.country}),
                hardware_order_failed(),
            )
            .await?;
        } else {
            self.record(
                run_id,
                WellKnownStep::ProvisionHardware,
                StepStatus::Success,
                None,
                json!({"country": employment.country}),
                hardware_ordered(&employment.country, &action_reference("hw")),
            )
            .await?;
        }

        self.record(
            run_id,
            WellKnownStep::ProvisionAccess,
            StepStatus::Success,
            None,
            json!({"department": job.department}),
            access_configured(&job.department),
        )
        .await?;

        let status = if hardware_failed { "PARTIAL" } else { "SUCCESS" };
        self.record(
            run_id,
            WellKnownStep::FinishRun,
            StepStatus::Success,
            None,
            Value::Null,
            json!({"status": status}),
        )
        .await?;

        if hardware_failed {
            return Ok(EngineReply {
                transport_succeeded: true,
                status: Some(status.to_owned()),
                summary: Some(format!(
                    "Accounts and access were provisioned but the hardware order failed: {HARDWARE_VENDOR_TIMEOUT}"
                )),
                anomalies: Some(json!([{
                    "type": "HARDWARE_PROVISIONING_FAILED",
                    "reason": HARDWARE_VENDOR_TIMEOUT,
                }])),
            });
        }

        Ok(EngineReply {
            transport_succeeded: true,
            status: Some(status.to_owned()),
            summary: Some(format!(
                "{} {} was onboarded automatically",
                candidate.first_name, candidate.last_name
            )),
            anomalies: None,
        })
    }
}

#[async_trait]
impl OrchestrationEngine for SimulatedOrchestrationEngine {
    async fn forward_event(&self, request: EngineForwardRequest) -> AppResult<EngineReply> {
        tracing::debug!(run_id = %request.run_id, "playing simulated onboarding workflow");
        self.play(request.run_id, &request.event).await
    }
}
