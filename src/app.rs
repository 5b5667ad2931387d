//! Application Assembly
//! Mission: Shared state and router wiring, reused by the binary and tests

use crate::auth::{api as auth_api, auth_middleware, CredentialStore, TokenService};
use crate::metrics::api as metrics_api;
use crate::middleware::request_logging;
use crate::participants::{api as participants_api, ParticipantRepository};
use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<ParticipantRepository>,
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<TokenService>,
}

/// Assemble the full router: public login/liveness routes plus the
/// token-gated participant and metrics routes.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/token", post(auth_api::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route(
            "/participants/",
            get(participants_api::list_participants).post(participants_api::create_participant),
        )
        .route(
            "/participants/:id",
            put(participants_api::update_participant)
                .delete(participants_api::delete_participant),
        )
        .route("/metrics/", get(metrics_api::get_metrics))
        .route_layer(axum::middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

/// Liveness message - GET /
async fn root() -> Json<Value> {
    Json(json!({ "message": "Clinical Trial API is running" }))
}

/// Health probe - GET /health
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
