//! Demo responders standing in for the account, hardware, and access vendors.

use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use ledger_core::{AppError, CallerIdentity};
use ledger_domain::{
    HARDWARE_VENDOR_TIMEOUT, access_configured, account_provisioned, action_reference,
    hardware_order_failed, hardware_ordered,
};
use serde_json::Value;

use crate::dto::{ProvisionAccessRequest, ProvisionAccountsRequest, ProvisionHardwareRequest};
use crate::error::ApiResult;

pub async fn provision_accounts_handler(
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<ProvisionAccountsRequest>,
) -> ApiResult<Json<Value>> {
    caller.require_internal()?;
    let run_id = required(payload.run_id.as_deref(), "run_id")?;
    let email = required(payload.email.as_deref(), "email")?;

    tracing::info!(run_id, "mock account provisioning");
    Ok(Json(account_provisioned(email, &action_reference("acct"))))
}

pub async fn provision_hardware_handler(
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<ProvisionHardwareRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    caller.require_internal()?;
    let run_id = required(payload.run_id.as_deref(), "run_id")?;
    let country = required(payload.country.as_deref(), "country")?;

    if payload.simulate_it_failure() {
        tracing::warn!(run_id, reason = HARDWARE_VENDOR_TIMEOUT, "mock hardware order failed");
        return Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(hardware_order_failed()),
        ));
    }

    tracing::info!(run_id, country, "mock hardware order");
    Ok((
        StatusCode::OK,
        Json(hardware_ordered(country, &action_reference("hw"))),
    ))
}

pub async fn provision_access_handler(
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<ProvisionAccessRequest>,
) -> ApiResult<Json<Value>> {
    caller.require_internal()?;
    let run_id = required(payload.run_id.as_deref(), "run_id")?;
    let department = required(payload.department.as_deref(), "department")?;

    tracing::info!(run_id, department, "mock access configuration");
    Ok(Json(access_configured(department)))
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation(format!("missing required field '{field}'")))
}
