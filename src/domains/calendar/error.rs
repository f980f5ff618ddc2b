//! Calendar-specific error types.

use thiserror::Error;

use crate::domains::auth::AuthError;

/// Errors that can occur during calendar operations.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// Malformed date or time input, detected before any network call.
    #[error("Invalid date or time: {0}")]
    Validation(String),

    /// The Calendar API rejected the request or could not be reached.
    #[error("Calendar API error: {message}")]
    Upstream {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        message: String,
    },

    /// Client configuration, token refresh or token storage failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl CalendarError {
    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an upstream error for a received HTTP response.
    pub fn upstream(status: u16, msg: impl Into<String>) -> Self {
        Self::Upstream {
            status: Some(status),
            message: msg.into(),
        }
    }

    /// Create an upstream error for a request that got no response.
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: msg.into(),
        }
    }

    /// Create an upstream error for a call attempted before authorization.
    pub fn not_authorized() -> Self {
        Self::Upstream {
            status: None,
            message: AuthError::NotAuthorized.to_string(),
        }
    }

    /// Whether the Calendar API rejected the access token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Upstream { status: Some(401), .. })
    }
}
