//! Transport layer for the MCP server.
//!
//! MCP is served over STDIO only. The error type is shared with the
//! authorization web endpoint.

mod error;
pub mod stdio;

pub use error::{TransportError, TransportResult};
pub use stdio::StdioTransport;
