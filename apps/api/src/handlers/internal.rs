use axum::Json;
use axum::extract::{Extension, State};
use ledger_core::CallerIdentity;

use crate::dto::{FinishRunRequest, FinishRunResponse, RecordStepRequest, RecordStepResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn record_step_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<RecordStepRequest>,
) -> ApiResult<Json<RecordStepResponse>> {
    let step = state
        .step_recorder_service
        .record_step(&caller, payload.try_into()?)
        .await?;

    Ok(Json(RecordStepResponse {
        ok: true,
        step_id: step.id,
    }))
}

pub async fn finish_run_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<FinishRunRequest>,
) -> ApiResult<Json<FinishRunResponse>> {
    let result = state
        .run_lifecycle_service
        .apply_terminal_status(&caller, payload.try_into()?)
        .await?;

    Ok(Json(FinishRunResponse {
        ok: true,
        applied: result.applied,
    }))
}
