use async_trait::async_trait;
use ledger_core::{AppResult, RunId};
use ledger_domain::OnboardingEvent;
use serde_json::Value;

/// Event forwarded to the orchestration engine for one new run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineForwardRequest {
    /// Run assigned to the event.
    pub run_id: RunId,
    /// Validated event, carrying the original payload.
    pub event: OnboardingEvent,
}

/// What the orchestration engine answered, leniently decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineReply {
    /// Whether the call succeeded at the transport level.
    pub transport_succeeded: bool,
    /// Status reported by the engine, verbatim.
    pub status: Option<String>,
    /// Outcome summary reported by the engine.
    pub summary: Option<String>,
    /// Anomaly detail reported by the engine.
    pub anomalies: Option<Value>,
}

impl EngineReply {
    /// Reply for an engine that could not be reached.
    #[must_use]
    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Decodes a response body; fields of the wrong shape are treated as absent.
    #[must_use]
    pub fn from_body(transport_succeeded: bool, body: &Value) -> Self {
        let text = |field: &str| {
            body.get(field)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned)
        };

        Self {
            transport_succeeded,
            status: text("status"),
            summary: text("summary"),
            anomalies: body.get("anomalies").filter(|value| !value.is_null()).cloned(),
        }
    }
}

/// Port for the external engine that sequences provisioning actions.
#[async_trait]
pub trait OrchestrationEngine: Send + Sync {
    /// Forwards an event and waits for the engine's synchronous reply.
    ///
    /// An error means the engine could not be reached.
    async fn forward_event(&self, request: EngineForwardRequest) -> AppResult<EngineReply>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::EngineReply;

    #[test]
    fn malformed_fields_are_treated_as_absent() {
        let reply = EngineReply::from_body(
            true,
            &json!({"status": 3, "summary": "", "anomalies": null}),
        );

        assert!(reply.transport_succeeded);
        assert_eq!(reply.status, None);
        assert_eq!(reply.summary, None);
        assert_eq!(reply.anomalies, None);
    }

    #[test]
    fn well_formed_body_is_decoded() {
        let reply = EngineReply::from_body(
            false,
            &json!({"status": "PARTIAL", "summary": "hardware failed", "anomalies": [{"type": "X"}]}),
        );

        assert_eq!(reply.status.as_deref(), Some("PARTIAL"));
        assert_eq!(reply.summary.as_deref(), Some("hardware failed"));
        assert_eq!(reply.anomalies, Some(json!([{"type": "X"}])));
    }
}
