use axum::Json;
use axum::extract::{Extension, State};
use ledger_core::CallerIdentity;
use serde_json::Value;

use crate::dto::SubmitEventResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn offer_signed_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<SubmitEventResponse>> {
    let result = state
        .run_lifecycle_service
        .submit_event(&caller, payload)
        .await?;

    Ok(Json(SubmitEventResponse::from(result)))
}
