//! MCP Server implementation.
//!
//! The handler advertises the tools capability and routes calls through the
//! `ToolRouter` built in `domains/tools/router.rs`.

use std::sync::Arc;

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};

use super::config::Config;
use crate::domains::{calendar::CalendarService, tools::build_tool_router};

const INSTRUCTIONS: &str = "Google Calendar access for the authorized account. \
Use getMyCalendarDataByDate to list the meetings on a date (YYYY-MM-DD, defaults to today) \
and addCalendarEvent to create an event; event times are interpreted at UTC+06:00. \
If a tool reports that the server is not authorized, open http://localhost:3001 in a browser \
and complete the Google consent flow.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server backed by the given calendar service.
    pub fn new(config: Config, calendar: Arc<CalendarService>) -> Self {
        Self {
            config: Arc::new(config),
            tool_router: build_tool_router::<Self>(calendar),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Names of the registered tools.
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
