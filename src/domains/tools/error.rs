//! Tool-specific error types.

use thiserror::Error;

use crate::domains::calendar::CalendarError;

/// Errors that can occur during tool operations.
///
/// Never propagated past the tool boundary: every variant is rendered into
/// an error payload by the tool that produced it.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The calendar operation failed.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}
