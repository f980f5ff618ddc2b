//! Error types and handling for the MCP server.
//!
//! A unified error type wrapping the domain errors and external failures.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain.
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// Error originating from the auth domain.
    #[error("Auth error: {0}")]
    Auth(#[from] crate::domains::auth::AuthError),

    /// Error originating from the calendar domain.
    #[error("Calendar error: {0}")]
    Calendar(#[from] crate::domains::calendar::CalendarError),

    /// Error from a transport or the web endpoint.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::AuthError;

    #[test]
    fn test_auth_error_converts() {
        let err: Error = AuthError::NotAuthorized.into();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("Not authorized"));
    }
}
