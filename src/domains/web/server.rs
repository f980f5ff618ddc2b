//! Listener for the OAuth authorization endpoint.

use std::sync::Arc;

use tracing::info;

use super::routes::{CALLBACK_PATH, router};
use crate::core::config::WebConfig;
use crate::core::transport::{TransportError, TransportResult};
use crate::domains::auth::AuthClient;

/// HTTP server exposing the authorization routes.
pub struct WebServer {
    config: WebConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: WebConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Serve until the listener fails.
    pub async fn run(self, auth: Arc<AuthClient>) -> TransportResult<()> {
        let addr = self.address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Authorization endpoint listening on http://{}", addr);
        info!("  GET  /                - authorization status");
        info!("  GET  {} - OAuth redirect target", CALLBACK_PATH);

        axum::serve(listener, router(auth))
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}
