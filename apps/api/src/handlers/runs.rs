use axum::Json;
use axum::extract::{Path, Query, State};
use ledger_domain::RunStatus;

use crate::dto::{RunDetailResponse, RunEvidenceResponse, RunListQueryRequest, RunResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_runs_handler(
    State(state): State<AppState>,
    Query(query): Query<RunListQueryRequest>,
) -> ApiResult<Json<Vec<RunResponse>>> {
    let status = query
        .status
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(RunStatus::parse)
        .transpose()?;

    let runs = state
        .run_view_service
        .list_runs(status, query.limit, query.offset)
        .await?
        .iter()
        .map(RunResponse::from)
        .collect();

    Ok(Json(runs))
}

pub async fn get_run_handler(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> ApiResult<Json<RunDetailResponse>> {
    let view = state.run_view_service.get_run(run_id.as_str()).await?;

    Ok(Json(RunDetailResponse::from(view)))
}

pub async fn run_evidence_handler(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> ApiResult<Json<RunEvidenceResponse>> {
    let view = state.run_view_service.run_evidence(run_id.as_str()).await?;

    Ok(Json(RunEvidenceResponse::from(view)))
}
