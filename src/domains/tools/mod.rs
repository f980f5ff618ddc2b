//! Tools domain module.
//!
//! Tools are the operations MCP clients can call. Both tools here wrap a
//! calendar operation and always answer with a single JSON text payload;
//! failures are returned as `{"error": ...}` payloads, never as protocol
//! faults.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - ToolRouter builder used by the MCP server handler
//! - `error.rs` - Tool-specific error types

pub mod definitions;
mod error;
pub mod router;

pub use error::ToolError;
pub use router::build_tool_router;
