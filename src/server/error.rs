//! Error-to-HTTP response conversion.

use crate::conversion::FailureKind;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Error returned by API handlers as `{"error": ..., "code": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            FailureKind::InvalidRequest.code(),
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    /// Map a failed conversion to its HTTP status.
    pub fn from_failure(kind: FailureKind, message: impl Into<String>) -> Self {
        let status = match kind {
            FailureKind::InvalidRequest => StatusCode::BAD_REQUEST,
            FailureKind::Setup => StatusCode::SERVICE_UNAVAILABLE,
            FailureKind::Conversion => StatusCode::UNPROCESSABLE_ENTITY,
            FailureKind::Filesystem => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, kind.code(), message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                error = %self.message,
                "Server error in API handler"
            );
        }

        let body = json!({
            "error": self.message,
            "code": self.code,
        });

        (self.status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_map_to_statuses() {
        let cases = [
            (FailureKind::InvalidRequest, StatusCode::BAD_REQUEST),
            (FailureKind::Setup, StatusCode::SERVICE_UNAVAILABLE),
            (FailureKind::Conversion, StatusCode::UNPROCESSABLE_ENTITY),
            (FailureKind::Filesystem, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (kind, status) in cases {
            let err = ApiError::from_failure(kind, "boom");
            assert_eq!(err.status(), status);
            assert_eq!(err.code(), kind.code());
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn bad_request_uses_invalid_request_code() {
        let err = ApiError::bad_request("missing file");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "invalid_request");
        assert_eq!(err.message(), "missing file");
    }
}
