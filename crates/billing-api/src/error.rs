//! # API Error Types
//!
//! Error types for calls against the billing backend.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Local       │  │      Auth       │  │       Transport         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  Unauthorized   │  │  Connection             │ │
//! │  │  NotLoggedIn    │  │  Forbidden      │  │  Timeout                │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Backend      │  │    Protocol     │  │    Configuration        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotFound       │  │  Deserialization│  │  InvalidConfig          │ │
//! │  │  Server         │  │                 │  │  ConfigLoad/SaveFailed  │ │
//! │  │  Rejected       │  │                 │  │                         │ │
//! │  │                 │  │                 │  │  SessionStorage         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried automatically. [`ApiError::is_retryable`] only tells the
//! operator whether trying again could help.

use billing_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Every way a console operation can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Rejected before anything was sent.
    #[error("{0}")]
    Validation(#[from] CoreError),

    /// No stored session.
    #[error("Not logged in. Run `billing login` first.")]
    NotLoggedIn,

    // =========================================================================
    // Auth Errors
    // =========================================================================
    /// Bad credentials or an expired token (HTTP 401).
    #[error("{0}")]
    Unauthorized(String),

    /// The signed-in role may not perform this operation (HTTP 403 or local check).
    #[error("{0}")]
    Forbidden(String),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("{message} (HTTP {status})")]
    Server { status: u16, message: String },

    /// HTTP 200 with `success: false`.
    #[error("{0}")]
    Rejected(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The backend could not be reached.
    #[error("Cannot reach billing server: {0}")]
    Connection(String),

    /// No response within the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The response body did not have the expected shape.
    #[error("Unexpected response from billing server: {0}")]
    Deserialization(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Reading or writing the session file failed.
    #[error("Session storage error: {0}")]
    SessionStorage(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(CoreError::Validation(err))
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidConfig(format!("invalid base URL: {err}"))
    }
}

impl From<toml::de::Error> for ApiError {
    fn from(err: toml::de::Error) -> Self {
        ApiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ApiError {
    fn from(err: toml::ser::Error) -> Self {
        ApiError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialization(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ApiError {
    /// Maps a non-success HTTP status and the backend's message (if any).
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.filter(|m| !m.trim().is_empty());
        match status {
            401 => ApiError::Unauthorized(
                message.unwrap_or_else(|| "Session expired. Please log in again.".to_string()),
            ),
            403 => ApiError::Forbidden(
                message.unwrap_or_else(|| "You are not allowed to do that".to_string()),
            ),
            404 => ApiError::NotFound(message.unwrap_or_else(|| "Not found".to_string())),
            s if s >= 500 => ApiError::Server {
                status: s,
                message: message.unwrap_or_else(|| "Billing server error".to_string()),
            },
            s => ApiError::Server {
                status: s,
                message: message.unwrap_or_else(|| "Request rejected".to_string()),
            },
        }
    }

    /// Returns true if trying the same operation again could succeed.
    ///
    /// ## Retryable Errors
    /// - Connection failures
    /// - Timeouts
    /// - 5xx responses
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Connection(_) | ApiError::Timeout(_) => true,
            ApiError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the operator has to log in (again).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::NotLoggedIn)
    }

    /// Returns true if the operation was rejected before reaching the backend.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }

    /// Notification text for the operator.
    ///
    /// Mostly the `Display` text; backend failures drop the status code and
    /// protocol failures hide parser detail.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Deserialization(_) => {
                "Unexpected response from billing server".to_string()
            }
            other => other.to_string(),
        }
    }
}
