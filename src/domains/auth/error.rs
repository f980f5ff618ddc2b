//! Authorization-specific error types.

use thiserror::Error;

/// Errors raised by the credential store and the authorization client.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The client-secret file is missing or structurally invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No access token is held; the consent flow has not been completed.
    #[error("Not authorized. Please complete the OAuth 2.0 flow.")]
    NotAuthorized,

    /// The token endpoint rejected a code exchange or refresh.
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// The token file could not be written.
    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl AuthError {
    /// Create a new configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new authorization error.
    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }
}
