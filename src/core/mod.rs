//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the MCP server handler and the STDIO
//! transport.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{StdioTransport, TransportError};
