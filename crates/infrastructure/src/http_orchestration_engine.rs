use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use ledger_application::{EngineForwardRequest, EngineReply, OrchestrationEngine};
use ledger_core::{AppError, AppResult};
use serde_json::Value;
use url::Url;

/// Orchestration engine reached over HTTP, typically an n8n webhook.
pub struct HttpOrchestrationEngine {
    http_client: reqwest::Client,
    endpoint: Url,
    internal_api_key: String,
}

impl HttpOrchestrationEngine {
    /// Creates an engine adapter. Transport timeouts belong to the client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, endpoint: Url, internal_api_key: String) -> Self {
        Self {
            http_client,
            endpoint,
            internal_api_key,
        }
    }

    fn request_body(&self, request: &EngineForwardRequest) -> Value {
        let mut body = request.event.with_run_id(request.run_id);
        if let Value::Object(map) = &mut body {
            map.insert(
                "internal_api_key".to_owned(),
                Value::String(self.internal_api_key.clone()),
            );
            let occurred_at = request.event.occurred_at().map_or_else(
                || Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                ToOwned::to_owned,
            );
            map.insert("occurred_at".to_owned(), Value::String(occurred_at));
        }

        body
    }
}

#[async_trait]
impl OrchestrationEngine for HttpOrchestrationEngine {
    async fn forward_event(&self, request: EngineForwardRequest) -> AppResult<EngineReply> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&self.request_body(&request))
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "orchestration engine transport error for run '{}': {error}",
                    request.run_id
                ))
            })?;

        let status = response.status();
        let body = match response.json::<Value>().await {
            Ok(body) => body,
            Err(error) => {
                tracing::debug!(
                    run_id = %request.run_id,
                    http_status = status.as_u16(),
                    error = %error,
                    "orchestration engine reply is not JSON"
                );
                Value::Null
            }
        };

        if !status.is_success() {
            tracing::warn!(
                run_id = %request.run_id,
                http_status = status.as_u16(),
                "orchestration engine returned an error status"
            );
        }

        Ok(EngineReply::from_body(status.is_success(), &body))
    }
}

#[cfg(test)]
mod tests {
    use ledger_application::{EngineForwardRequest, OrchestrationEngine};
    use ledger_core::{AppError, RunId};
    use ledger_domain::OnboardingEvent;
    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use url::Url;

    use super::HttpOrchestrationEngine;

    fn engine() -> HttpOrchestrationEngine {
        HttpOrchestrationEngine::new(
            reqwest::Client::new(),
            Url::parse("http://localhost:5678/webhook/offer-signed")
                .unwrap_or_else(|_| unreachable!()),
            "secret".to_owned(),
        )
    }

    fn event(occurred_at: Option<&str>) -> OnboardingEvent {
        let mut payload = json!({
            "event_id": "evt_400",
            "candidate": {"first_name": "Ana", "last_name": "Lopez", "email": "ana@example.com"},
            "job": {"title": "Designer", "department": "Product"},
            "employment": {"country": "FR", "contract_type": "permanent", "start_date": "2026-12-01"}
        });
        if let (Some(occurred_at), Value::Object(map)) = (occurred_at, &mut payload) {
            map.insert("occurred_at".to_owned(), json!(occurred_at));
        }
        OnboardingEvent::from_payload(payload).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn body_carries_run_id_key_and_caller_timestamp() {
        let run_id = RunId::new();
        let body = engine().request_body(&EngineForwardRequest {
            run_id,
            event: event(Some("2026-10-01T09:00:00Z")),
        });

        assert_eq!(body["run_id"], json!(run_id.to_string()));
        assert_eq!(body["internal_api_key"], json!("secret"));
        assert_eq!(body["occurred_at"], json!("2026-10-01T09:00:00Z"));
        assert_eq!(body["candidate"]["email"], json!("ana@example.com"));
    }

    #[test]
    fn missing_timestamp_is_filled_with_now() {
        let body = engine().request_body(&EngineForwardRequest {
            run_id: RunId::new(),
            event: event(None),
        });

        let occurred_at = body["occurred_at"].as_str().unwrap_or_default();
        assert!(chrono::DateTime::parse_from_rfc3339(occurred_at).is_ok());
    }

    fn engine_at(endpoint: Url) -> HttpOrchestrationEngine {
        let http_client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap_or_else(|error| panic!("failed to build test http client: {error}"));
        HttpOrchestrationEngine::new(http_client, endpoint, "secret".to_owned())
    }

    fn forward_request() -> EngineForwardRequest {
        EngineForwardRequest {
            run_id: RunId::new(),
            event: event(Some("2026-10-01T09:00:00Z")),
        }
    }

    /// Serves one canned HTTP reply on a local port and returns the webhook url.
    async fn serve_single_reply(
        status_line: &'static str,
        content_type: &'static str,
        body: &'static str,
    ) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|error| panic!("failed to bind test listener: {error}"));
        let address = listener
            .local_addr()
            .unwrap_or_else(|error| panic!("failed to read test listener address: {error}"));

        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            read_full_request(&mut socket).await;

            let reply = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        Url::parse(&format!("http://{address}/webhook/offer-signed"))
            .unwrap_or_else(|_| unreachable!())
    }

    async fn read_full_request(socket: &mut tokio::net::TcpStream) {
        let mut received = Vec::new();
        let mut chunk = [0_u8; 4096];

        loop {
            let Ok(read) = socket.read(&mut chunk).await else {
                return;
            };
            if read == 0 {
                return;
            }
            received.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&received);
            let Some(header_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let content_length = text[..header_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if received.len() >= header_end + 4 + content_length {
                return;
            }
        }
    }

    #[tokio::test]
    async fn error_status_with_html_body_is_a_failed_transport_without_fields() {
        let endpoint = serve_single_reply(
            "502 Bad Gateway",
            "text/html",
            "<html><body>Bad Gateway</body></html>",
        )
        .await;

        let reply = engine_at(endpoint)
            .forward_event(forward_request())
            .await
            .unwrap_or_else(|error| panic!("engine reply should be returned: {error}"));

        assert!(!reply.transport_succeeded);
        assert_eq!(reply.status, None);
        assert_eq!(reply.summary, None);
        assert_eq!(reply.anomalies, None);
    }

    #[tokio::test]
    async fn success_status_with_text_body_is_treated_as_empty() {
        let endpoint = serve_single_reply("200 OK", "text/plain", "Workflow was started").await;

        let reply = engine_at(endpoint)
            .forward_event(forward_request())
            .await
            .unwrap_or_else(|error| panic!("engine reply should be returned: {error}"));

        assert!(reply.transport_succeeded);
        assert_eq!(reply.status, None);
        assert_eq!(reply.summary, None);
        assert_eq!(reply.anomalies, None);
    }

    #[tokio::test]
    async fn success_status_with_json_body_is_decoded() {
        let endpoint = serve_single_reply(
            "200 OK",
            "application/json",
            r#"{"status":"COMPLETED","summary":"all provisioned","anomalies":[]}"#,
        )
        .await;

        let reply = engine_at(endpoint)
            .forward_event(forward_request())
            .await
            .unwrap_or_else(|error| panic!("engine reply should be returned: {error}"));

        assert!(reply.transport_succeeded);
        assert_eq!(reply.status.as_deref(), Some("COMPLETED"));
        assert_eq!(reply.summary.as_deref(), Some("all provisioned"));
        assert_eq!(reply.anomalies, Some(json!([])));
    }

    #[tokio::test]
    async fn unreachable_engine_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|error| panic!("failed to bind test listener: {error}"));
        let address = listener
            .local_addr()
            .unwrap_or_else(|error| panic!("failed to read test listener address: {error}"));
        drop(listener);

        let endpoint = Url::parse(&format!("http://{address}/webhook/offer-signed"))
            .unwrap_or_else(|_| unreachable!());
        let result = engine_at(endpoint).forward_event(forward_request()).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
