//! API Error Responses
//! Mission: Uniform error payloads across every endpoint

use crate::participants::models::ParticipantError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Error payload returned to clients.
///
/// `error_code` is present only for validation failures that carry a
/// machine-readable code; it is omitted from the JSON otherwise.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    pub path: String,
}

/// API-level error carrying the HTTP status and response body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>, path: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ErrorBody {
                error: message.into(),
                error_code: None,
                path: path.to_string(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>, path: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                error: message.into(),
                error_code: None,
                path: path.to_string(),
            },
        }
    }

    pub fn validation(code: &'static str, message: impl Into<String>, path: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: message.into(),
                error_code: Some(code),
                path: path.to_string(),
            },
        }
    }

    /// Generic 500. Details are logged server-side, never sent to the caller.
    pub fn internal(path: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: "Internal server error".to_string(),
                error_code: None,
                path: path.to_string(),
            },
        }
    }

    /// Map a domain error from the participant layer to an API response.
    pub fn from_participant(err: ParticipantError, path: &str) -> Self {
        match err {
            ParticipantError::NotFound => Self::not_found("Participant not found", path),
            ParticipantError::Storage(source) => {
                error!(error = %source, path, "participant storage failure");
                Self::internal(path)
            }
            other => {
                let message = other.to_string();
                let code = other.code().unwrap_or("VALIDATION_ERROR");
                Self::validation(code, message, path)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::unauthorized("nope", "/token").status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::not_found("missing", "/participants/x").status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("INVALID_AGE", "bad age", "/participants/").status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::internal("/metrics/").status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_code_omitted_when_absent() {
        let err = ApiError::not_found("Participant not found", "/participants/abc");
        let json = serde_json::to_value(&err.body).unwrap();
        assert!(json.get("error_code").is_none());
        assert_eq!(json["error"], "Participant not found");
        assert_eq!(json["path"], "/participants/abc");
    }

    #[test]
    fn test_validation_error_carries_code() {
        let err = ApiError::validation("DUPLICATE_SUBJECT_ID", "dup", "/participants/");
        let json = serde_json::to_value(&err.body).unwrap();
        assert_eq!(json["error_code"], "DUPLICATE_SUBJECT_ID");
    }

    #[test]
    fn test_participant_not_found_maps_to_404() {
        let err = ApiError::from_participant(ParticipantError::NotFound, "/participants/x");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.body.error_code.is_none());
    }

    #[test]
    fn test_participant_validation_maps_to_400_with_code() {
        let err = ApiError::from_participant(ParticipantError::InvalidAge, "/participants/");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.error_code, Some("INVALID_AGE"));
    }

    #[test]
    fn test_storage_error_is_opaque_500() {
        let err = ApiError::from_participant(
            ParticipantError::Storage(anyhow::anyhow!("disk on fire")),
            "/participants/",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.error, "Internal server error");
        assert!(!err.body.error.contains("disk"));
    }
}
