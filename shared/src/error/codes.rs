//! Unified error codes for the rubric catalog tooling
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 6xxx: Catalog errors (categories, attribute groups, attributes)
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the definition
/// service and the admin frontend can share them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Category not found
    CategoryNotFound = 6101,
    /// Attribute group not found
    AttributeGroupNotFound = 6201,
    /// Attribute not found
    AttributeNotFound = 6301,
    /// Attribute definition is inconsistent (e.g. choice without options)
    AttributeDefinitionInvalid = 6305,
    /// Attribute value rejected by its variant rules
    AttributeValueInvalid = 6306,
    /// Option not found in the attribute's options group
    AttributeOptionNotFound = 6307,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Request timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Upstream service unavailable
    ServiceUnavailable = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Transient failures the caller may retry as-is
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::NetworkError | ErrorCode::TimeoutError | ErrorCode::ServiceUnavailable
        )
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::AttributeGroupNotFound => "Attribute group not found",
            ErrorCode::AttributeNotFound => "Attribute not found",
            ErrorCode::AttributeDefinitionInvalid => "Attribute definition is invalid",
            ErrorCode::AttributeValueInvalid => "Attribute value is invalid",
            ErrorCode::AttributeOptionNotFound => "Attribute option not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Request timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::ServiceUnavailable => "Service unavailable",
        }
    }

    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound
            | Self::ProductNotFound
            | Self::CategoryNotFound
            | Self::AttributeGroupNotFound
            | Self::AttributeNotFound
            | Self::AttributeOptionNotFound => StatusCode::NOT_FOUND,

            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            Self::PermissionDenied => StatusCode::FORBIDDEN,

            // Transient, the client can retry
            Self::NetworkError | Self::TimeoutError | Self::ServiceUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            Self::InternalError | Self::ConfigError | Self::AttributeDefinitionInvalid => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6201 => Ok(ErrorCode::AttributeGroupNotFound),
            6301 => Ok(ErrorCode::AttributeNotFound),
            6305 => Ok(ErrorCode::AttributeDefinitionInvalid),
            6306 => Ok(ErrorCode::AttributeValueInvalid),
            6307 => Ok(ErrorCode::AttributeOptionNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::ServiceUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
