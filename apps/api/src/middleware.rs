use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use ledger_core::{AppError, CallerIdentity};
use subtle::ConstantTimeEq;

use crate::error::ApiResult;
use crate::state::AppState;

pub const INTERNAL_KEY_HEADER: &str = "x-internal-key";

/// Admits callers presenting the shared internal key and tags them as internal.
pub async fn require_internal_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let presented = request
        .headers()
        .get(INTERNAL_KEY_HEADER)
        .map(|value| value.as_bytes())
        .unwrap_or_default();

    if !constant_time_eq(presented, state.internal_api_key.as_bytes()) {
        tracing::warn!(
            path = %request.uri().path(),
            "rejected internal request with missing or invalid key"
        );
        return Err(AppError::Unauthorized("invalid internal api key".to_owned()).into());
    }

    request
        .extensions_mut()
        .insert(CallerIdentity::internal("orchestration-engine"));
    Ok(next.run(request).await)
}

/// Tags callers of the public surface.
pub async fn attach_public_identity(mut request: Request, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(CallerIdentity::public("anonymous"));
    next.run(request).await
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.ct_eq(right).into()
}
