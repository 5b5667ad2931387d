//! Authentication API Endpoints
//! Mission: Exchange credentials for a bearer token

use crate::app::AppState;
use crate::auth::models::{LoginRequest, TokenResponse};
use crate::errors::ApiError;
use axum::{extract::State, http::Uri, Json};
use tracing::{error, info, warn};

/// Login endpoint - POST /token
pub async fn login(
    State(state): State<AppState>,
    uri: Uri,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    info!("Login attempt: {}", payload.username);

    if !state.credentials.authenticate(&payload.username, &payload.password) {
        warn!("Failed login attempt: {}", payload.username);
        return Err(ApiError::unauthorized(
            "Incorrect username or password",
            uri.path(),
        ));
    }

    let token = state.tokens.issue(&payload.username).map_err(|e| {
        error!(error = %e, "token issuance failed");
        ApiError::internal(uri.path())
    })?;

    info!("Login successful: {}", payload.username);

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}
