//! Metrics API Endpoint

use crate::app::AppState;
use crate::errors::ApiError;
use crate::metrics::aggregator::{summarize, MetricsSummary};
use axum::{extract::State, http::Uri, Json};

/// Summary metrics - GET /metrics/
pub async fn get_metrics(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<MetricsSummary>, ApiError> {
    let snapshot = state
        .repository
        .list()
        .map_err(|e| ApiError::from_participant(e, uri.path()))?;

    Ok(Json(summarize(&snapshot)))
}
