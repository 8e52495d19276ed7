//! Error types with HTTP status code mapping.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use crate::vocabulary::{Action, Subject};

/// Error type for access control operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Identity errors
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Forbidden: cannot {action} {subject}")]
    Forbidden { action: Action, subject: Subject },

    // Boundary parsing errors
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    #[error("Unknown data type: {0}")]
    UnknownDataType(String),

    #[error("Unknown priority: {0}")]
    UnknownPriority(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // System errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized | Error::TokenExpired => StatusCode::UNAUTHORIZED,
            Error::Forbidden { .. } => StatusCode::FORBIDDEN,

            Error::UnknownRole(_)
            | Error::UnknownAction(_)
            | Error::UnknownSubject(_)
            | Error::UnknownDataType(_)
            | Error::UnknownPriority(_) => StatusCode::BAD_REQUEST,

            Error::Config(_) | Error::Toml(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert error into HTTP response.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!("Internal error: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = serde_json::json!({
            "error": message
        });

        let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
        *response.status_mut() = status;
        response.headers_mut().insert(
            hyper::header::CONTENT_TYPE,
            hyper::header::HeaderValue::from_static("application/json"),
        );
        response
    }
}

/// Result type alias using the crate's Error.
pub type Result<T> = std::result::Result<T, Error>;
