//! Configuration management for the MCP server.
//!
//! Values come from defaults overridden by `MCP_`-prefixed environment
//! variables (a `.env` file is honored).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domains::auth::SCOPES;

/// Default location of the OAuth client secret file.
pub const DEFAULT_CREDENTIALS_PATH: &str = "./credentials.json";

/// Default location of the persisted token file.
pub const DEFAULT_TOKEN_PATH: &str = "./token.json";

/// Default Google Calendar API base URL.
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// OAuth client and token storage.
    pub oauth: OAuthConfig,

    /// Calendar API access.
    pub calendar: CalendarConfig,

    /// Authorization web endpoint.
    pub web: WebConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// OAuth configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Path to the client secret file with a `web` section.
    pub credentials_path: PathBuf,

    /// Path where tokens are persisted.
    pub token_path: PathBuf,

    /// Scopes requested at consent.
    pub scopes: Vec<String>,
}

/// Calendar API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Base URL of the Calendar v3 REST API.
    pub api_base_url: String,
}

/// Authorization endpoint configuration.
///
/// The port is fixed so it matches the redirect URI registered with Google.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_CALENDAR_API_BASE.to_string(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "google-calendar-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            oauth: OAuthConfig::default(),
            calendar: CalendarConfig::default(),
            web: WebConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Recognized: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_CREDENTIALS_PATH`,
    /// `MCP_TOKEN_PATH`, `MCP_CALENDAR_API_BASE`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(path) = std::env::var("MCP_CREDENTIALS_PATH") {
            config.oauth.credentials_path = PathBuf::from(path);
            info!("Client secret path set to {:?}", config.oauth.credentials_path);
        }

        if let Ok(path) = std::env::var("MCP_TOKEN_PATH") {
            config.oauth.token_path = PathBuf::from(path);
            info!("Token path set to {:?}", config.oauth.token_path);
        }

        if let Ok(base) = std::env::var("MCP_CALENDAR_API_BASE") {
            config.calendar.api_base_url = base.trim_end_matches('/').to_string();
        }

        config
    }
}
