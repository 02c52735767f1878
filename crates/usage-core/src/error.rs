//! Shared error type across usage-tracking crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Wrong HTTP method for the route.
    MethodNotAllowed,
    /// Body is not a JSON object of the expected shape.
    BadRequest,
    /// Body parsed, but a required field is empty.
    UnprocessableEntity,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in log records.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// HTTP status code returned to the caller.
    pub fn http_status(self) -> u16 {
        match self {
            ClientCode::MethodNotAllowed => 405,
            ClientCode::BadRequest => 400,
            ClientCode::UnprocessableEntity => 422,
            ClientCode::Internal => 500,
        }
    }

    /// Short plain-text body returned to the caller. Never carries internal detail.
    pub fn message(self) -> &'static str {
        match self {
            ClientCode::MethodNotAllowed => "POST only",
            ClientCode::BadRequest => "invalid JSON",
            ClientCode::UnprocessableEntity => "missing user",
            ClientCode::Internal => "internal error",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, UsageError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("missing user")]
    MissingUser,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("bind {addr} failed: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("internal: {0}")]
    Internal(String),
}

impl UsageError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            UsageError::MethodNotAllowed(_) => ClientCode::MethodNotAllowed,
            UsageError::InvalidJson(_) => ClientCode::BadRequest,
            UsageError::MissingUser => ClientCode::UnprocessableEntity,
            UsageError::Config(_) | UsageError::Bind { .. } | UsageError::Internal(_) => {
                ClientCode::Internal
            }
        }
    }
}
