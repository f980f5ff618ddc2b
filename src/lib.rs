//! Google Calendar MCP Server Library
//!
//! An MCP server exposing two calendar tools over STDIO, backed by an OAuth
//! authorization-code flow completed through a local web endpoint.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler and STDIO transport
//! - **domains**: business logic organized by bounded contexts
//!   - **auth**: client secret loading, token persistence, code exchange and refresh
//!   - **calendar**: Calendar v3 access for listing and inserting events
//!   - **tools**: `getMyCalendarDataByDate` and `addCalendarEvent`
//!   - **web**: `GET /` and `GET /oauth2callback` on port 3001
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use calendar_mcp_server::core::{Config, McpServer, StdioTransport};
//! use calendar_mcp_server::domains::auth::{AuthClient, CredentialStore};
//! use calendar_mcp_server::domains::calendar::{CalendarService, GoogleCalendarApi};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let auth = Arc::new(AuthClient::new(
//!         CredentialStore::from_config(&config.oauth),
//!         config.oauth.scopes.clone(),
//!     ));
//!     let api = Arc::new(GoogleCalendarApi::from_config(&config.calendar));
//!     let calendar = Arc::new(CalendarService::new(auth, api));
//!     StdioTransport::run(McpServer::new(config, calendar)).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
