//! Engine error types

use crate::resolver::ValueRejection;
use shared::error::{AppError, ErrorCategory, ErrorCode};
use shared::types::{GroupId, Slug};
use thiserror::Error;

/// Failure to retrieve an AST from the definition service
///
/// Retry-capable; the controller keeps its value state when it sees one.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Connection-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request exceeded its lifetime
    #[error("Request timed out")]
    Timeout,

    /// Service answered with an error envelope
    #[error("Service rejected request: {0}")]
    Rejected(AppError),

    /// Service answered with something that is not an AST
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Transport(_) => ErrorCode::NetworkError,
            Self::Timeout => ErrorCode::TimeoutError,
            Self::Rejected(err) => err.code,
            Self::InvalidResponse(_) => ErrorCode::InvalidFormat,
        }
    }

    /// Code range of the failure: auth, catalog or system
    pub fn category(&self) -> ErrorCategory {
        self.code().category()
    }

    /// Whether issuing the same request again may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Rejected(err) => err.code.is_retryable(),
            Self::InvalidResponse(_) => false,
        }
    }
}

impl From<AppError> for FetchError {
    fn from(err: AppError) -> Self {
        Self::Rejected(err)
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Rejected(inner) => inner,
            other => AppError::with_message(other.code(), other.to_string()),
        }
    }
}

/// User edit that cannot be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Group is not part of the current AST
    #[error("Attribute group {0} is not editable")]
    UnknownGroup(GroupId),

    /// Attribute is not part of the group in the current AST
    #[error("Attribute {slug} is not editable in group {group_id}")]
    UnknownAttribute { group_id: GroupId, slug: Slug },

    /// Value does not fit the attribute's widget
    #[error("Value for {slug} rejected: {reason}")]
    Rejected { slug: Slug, reason: ValueRejection },
}

impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        let code = match &err {
            EditError::UnknownGroup(_) => ErrorCode::AttributeGroupNotFound,
            EditError::UnknownAttribute { .. } => ErrorCode::AttributeNotFound,
            EditError::Rejected {
                reason: ValueRejection::NotAnOption(_),
                ..
            } => ErrorCode::AttributeOptionNotFound,
            EditError::Rejected { .. } => ErrorCode::AttributeValueInvalid,
        };
        AppError::with_message(code, err.to_string())
    }
}
