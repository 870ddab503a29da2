//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::db::DatabaseError;
use crate::integrity::IntegrityViolation;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Vec<String>>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("{0}")]
    IntegrityViolation(IntegrityViolation),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, reasons) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail, None),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail, None)
            }
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "CONFLICT", detail, None),
            ApiError::IntegrityViolation(violation) => (
                StatusCode::CONFLICT,
                "REFERENTIAL_INTEGRITY",
                violation.message(),
                Some(violation.reasons),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                reasons,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Database(e) => e.into(),
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DatabaseError::ReferentialIntegrityViolation(v) => ApiError::IntegrityViolation(v),
            DatabaseError::ConstraintViolation(detail) => ApiError::Conflict(detail),
            DatabaseError::InvalidReference(_)
            | DatabaseError::Validation(_)
            | DatabaseError::InvalidEnum { .. }
            | DatabaseError::Serialization(_) => ApiError::BadRequest(err.to_string()),
            DatabaseError::Sqlite(_)
            | DatabaseError::MigrationFailed { .. }
            | DatabaseError::Io(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityKind, ValidationError};
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Patient not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert!(json["error"].get("reasons").is_none());
    }

    #[tokio::test]
    async fn integrity_violation_returns_409_with_reasons() {
        let violation = IntegrityViolation {
            entity: EntityKind::Specialty,
            id: 3,
            label: "Cardiology".into(),
            reasons: vec!["There are physicians with this specialty.".into()],
        };
        let response = ApiError::IntegrityViolation(violation).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "REFERENTIAL_INTEGRITY");
        assert_eq!(
            json["error"]["message"],
            "Cannot delete «Cardiology». There are physicians with this specialty."
        );
        assert_eq!(json["error"]["reasons"][0], "There are physicians with this specialty.");
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        // Internal errors hide details from client
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[test]
    fn database_errors_map_to_statuses() {
        let cases: Vec<(DatabaseError, StatusCode)> = vec![
            (DatabaseError::not_found("Patient", 9), StatusCode::NOT_FOUND),
            (
                DatabaseError::ConstraintViolation("UNIQUE constraint failed".into()),
                StatusCode::CONFLICT,
            ),
            (
                DatabaseError::InvalidReference("FOREIGN KEY constraint failed".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                DatabaseError::Validation(ValidationError::Required { field: "name" }),
                StatusCode::BAD_REQUEST,
            ),
            (
                DatabaseError::MigrationFailed { version: 1, reason: "x".into() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.into_response().status(), status);
        }
    }

    #[test]
    fn core_lock_error_is_internal() {
        let api: ApiError = CoreError::LockPoisoned.into();
        assert!(matches!(api, ApiError::Internal(_)));
    }
}
