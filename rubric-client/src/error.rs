//! Client error types

use rubric_engine::FetchError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned an error envelope
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        Self::Api {
            code: err.code.code(),
            message: err.message,
        }
    }
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) if e.is_timeout() => FetchError::Timeout,
            ClientError::Http(e) if e.is_decode() => FetchError::InvalidResponse(e.to_string()),
            ClientError::Http(e) => FetchError::Transport(e.to_string()),
            ClientError::Api { code, message } => {
                let code = ErrorCode::try_from(code).unwrap_or(ErrorCode::Unknown);
                FetchError::Rejected(AppError::with_message(code, message))
            }
            ClientError::InvalidResponse(msg) => FetchError::InvalidResponse(msg),
            ClientError::Serialization(e) => FetchError::InvalidResponse(e.to_string()),
            ClientError::Unauthorized => FetchError::Rejected(AppError::not_authenticated()),
            ClientError::NotFound(msg) => FetchError::Rejected(AppError::not_found(msg)),
            ClientError::Config(msg) => {
                FetchError::Rejected(AppError::with_message(ErrorCode::ConfigError, msg))
            }
        }
    }
}
