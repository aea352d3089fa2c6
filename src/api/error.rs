//! HTTP mapping of crate errors
//!
//! Every failure leaves the API as `{"code": "...", "message": "..."}`. Server-side
//! failures are logged in full and answered with a generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::errors::Error;

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code such as `NOT_FOUND`
    pub code: String,
    /// Human-readable description
    pub message: String,
}

impl Error {
    /// Status code and machine-readable error code for this error.
    #[must_use]
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Validation { .. } | Error::InvalidAmount { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            Error::Duplicate { .. } => (StatusCode::BAD_REQUEST, "DUPLICATE"),
            Error::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Error::Config { .. }
            | Error::PasswordHash { .. }
            | Error::Database(_)
            | Error::Token(_)
            | Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            if matches!(self, Error::Forbidden { .. } | Error::Unauthorized { .. }) {
                warn!(error = %self, "Request denied");
            }
            self.to_string()
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::validation(rejection.body_text())
    }
}
