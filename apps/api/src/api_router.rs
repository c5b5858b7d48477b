use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use ledger_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

use cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let public_routes = Router::new()
        .route(
            "/api/events/offer-signed",
            post(handlers::events::offer_signed_handler),
        )
        .route("/api/runs", get(handlers::runs::list_runs_handler))
        .route("/api/runs/{run_id}", get(handlers::runs::get_run_handler))
        .route(
            "/api/runs/{run_id}/evidence",
            get(handlers::runs::run_evidence_handler),
        )
        .route_layer(from_fn(middleware::attach_public_identity));

    let internal_routes = Router::new()
        .route(
            "/api/internal/steps",
            post(handlers::internal::record_step_handler),
        )
        .route(
            "/api/internal/runs/finish",
            post(handlers::internal::finish_run_handler),
        )
        .route(
            "/api/mock/provision-accounts",
            post(handlers::provisioning::provision_accounts_handler),
        )
        .route(
            "/api/mock/provision-hardware",
            post(handlers::provisioning::provision_hardware_handler),
        )
        .route(
            "/api/mock/provision-access",
            post(handlers::provisioning::provision_access_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_internal_auth,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(public_routes)
        .merge(internal_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
