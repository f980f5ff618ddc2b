//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging, loads OAuth credentials, starts
//! the authorization web endpoint and serves MCP over STDIO.

use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use calendar_mcp_server::core::{Config, McpServer, StdioTransport};
use calendar_mcp_server::domains::auth::{AuthClient, CredentialStore};
use calendar_mcp_server::domains::calendar::{CalendarService, GoogleCalendarApi};
use calendar_mcp_server::domains::web::WebServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let store = CredentialStore::from_config(&config.oauth);
    let auth = Arc::new(AuthClient::new(store, config.oauth.scopes.clone()));

    match auth.initialize().await {
        Ok(()) => {
            if auth.is_authorized().await {
                info!("Loaded saved tokens");
            } else {
                warn!(
                    "No saved tokens. Open http://localhost:{} to authorize calendar access",
                    config.web.port
                );
            }
        }
        Err(e) => error!(
            "OAuth client not initialized ({}). Place the client secret at {:?} and visit http://localhost:{}",
            e, config.oauth.credentials_path, config.web.port
        ),
    }

    let api = Arc::new(GoogleCalendarApi::from_config(&config.calendar));
    let calendar = Arc::new(CalendarService::new(auth.clone(), api));

    let web = WebServer::new(config.web.clone());
    tokio::spawn(async move {
        if let Err(e) = web.run(auth).await {
            error!("Authorization endpoint stopped: {}", e);
        }
    });

    let server = McpServer::new(config, calendar);
    info!("Server initialized");

    StdioTransport::run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout carries the MCP protocol.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
