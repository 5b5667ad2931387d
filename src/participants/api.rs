//! Participant API Endpoints
//! Mission: Token-gated CRUD over the participant repository

use crate::app::AppState;
use crate::errors::ApiError;
use crate::participants::models::{Participant, ParticipantCreate};
use axum::{
    extract::{Path, State},
    http::Uri,
    Json,
};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// List all participants - GET /participants/
pub async fn list_participants(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Vec<Participant>>, ApiError> {
    state
        .repository
        .list()
        .map(Json)
        .map_err(|e| ApiError::from_participant(e, uri.path()))
}

/// Create a participant - POST /participants/
pub async fn create_participant(
    State(state): State<AppState>,
    uri: Uri,
    Json(payload): Json<ParticipantCreate>,
) -> Result<Json<Participant>, ApiError> {
    state
        .repository
        .create(payload)
        .map(Json)
        .map_err(|e| ApiError::from_participant(e, uri.path()))
}

/// Update a participant - PUT /participants/:id
///
/// Accepts a partial JSON object; fields go through the typed-setter mapping.
pub async fn update_participant(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Participant>, ApiError> {
    let id = parse_participant_id(&id, uri.path())?;

    state
        .repository
        .update(id, &fields)
        .map(Json)
        .map_err(|e| ApiError::from_participant(e, uri.path()))
}

/// Delete a participant - DELETE /participants/:id
pub async fn delete_participant(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_participant_id(&id, uri.path())?;

    state
        .repository
        .delete(id)
        .map_err(|e| ApiError::from_participant(e, uri.path()))?;

    Ok(Json(json!({ "message": "Participant deleted successfully" })))
}

// Ids that do not parse as UUIDs cannot name a record, so they map to the
// same 404 as an unknown id.
fn parse_participant_id(raw: &str, path: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Participant not found", path))
}
