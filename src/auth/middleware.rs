//! Authentication Middleware
//! Mission: Protect participant and metrics endpoints with bearer tokens

use crate::auth::token::TokenService;
use crate::errors::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Middleware that requires a valid `Authorization: Bearer <token>` header.
///
/// On success the decoded claims are added to request extensions so handlers
/// can read the authenticated username.
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or_else(|| ApiError::unauthorized("Missing authorization token", &path))?;

    let claims = tokens
        .verify(&token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token", &path))?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
