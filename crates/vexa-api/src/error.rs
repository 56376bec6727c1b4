//! API error types and JSON error response formatting.
//!
//! ApiError keeps one JSON error shape across all endpoints and maps turn
//! failures to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use vexa_chat::{FailureKind, TurnFailure};

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "upstream_error").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// 500 Internal Server Error - a provider call failed.
    #[error("upstream error: {0}")]
    Upstream(String),
    /// 504 Gateway Timeout - the turn ran out of time.
    #[error("timeout: {0}")]
    Timeout(String),
    /// 500 Internal Server Error - unexpected server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg),
            ApiError::Upstream(msg) => ("upstream_error", msg),
            ApiError::Timeout(msg) => ("timeout", msg),
            ApiError::Internal(msg) => ("internal_error", msg),
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<TurnFailure> for ApiError {
    fn from(failure: TurnFailure) -> Self {
        match failure.kind {
            FailureKind::InvalidInput => ApiError::BadRequest(failure.message),
            FailureKind::Upstream => ApiError::Upstream(failure.message),
            FailureKind::Timeout => ApiError::Timeout(failure.message),
            FailureKind::Internal => ApiError::Internal(failure.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Upstream("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Timeout("x".into()).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_turn_failure() {
        let err = ApiError::from(TurnFailure {
            kind: FailureKind::InvalidInput,
            message: "No audio file provided".into(),
        });
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "No audio file provided"));

        let err = ApiError::from(TurnFailure {
            kind: FailureKind::Timeout,
            message: "Failed to process audio".into(),
        });
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::Upstream("Failed to generate response".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "upstream_error");
        assert_eq!(body.message, "Failed to generate response");
    }
}
