//! OAuth authorization routes.
//!
//! - `GET /` reloads the credential store and shows either a configuration
//!   error, a consent link, or the authorized status.
//! - `GET /oauth2callback?code=...` completes the code exchange and persists
//!   the tokens.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use crate::domains::auth::AuthClient;

/// Path of the redirect target registered with the OAuth client.
pub const CALLBACK_PATH: &str = "/oauth2callback";

/// State shared across web handlers.
#[derive(Clone)]
pub struct WebState {
    auth: Arc<AuthClient>,
}

/// Query string of the OAuth redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
}

/// Build the authorization router.
pub fn router(auth: Arc<AuthClient>) -> Router {
    Router::new()
        .route("/", get(home))
        .route(CALLBACK_PATH, get(oauth_callback))
        .with_state(WebState { auth })
        .layer(TraceLayer::new_for_http())
}

#[instrument(skip_all)]
async fn home(State(state): State<WebState>) -> (StatusCode, Html<String>) {
    let store = state.auth.store();
    if let Err(e) = state.auth.initialize().await {
        error!("OAuth client could not be initialized: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<p>Error: OAuth client could not be initialized. Check <code>{}</code> and server logs.</p>\n<p>{}</p>",
                encode_text(&store.credentials_path().display().to_string()),
                encode_text(&e.to_string())
            )),
        );
    }

    if state.auth.is_authorized().await {
        return (
            StatusCode::OK,
            Html(format!(
                "<p>Authorized! The MCP server is running and ready to use the Calendar API.</p>\n\
                 <p>You can now send commands to the MCP server that utilize the Google Calendar tools.</p>\n\
                 <p>Tokens saved to <code>{}</code>. You can close this browser tab.</p>",
                encode_text(&store.token_path().display().to_string())
            )),
        );
    }

    match state.auth.consent_url().await {
        Ok(url) => (
            StatusCode::OK,
            Html(format!(
                "<p>This application requires Google Calendar access for reading and adding events.</p>\n\
                 <p><a href=\"{}\">Authorize with Google</a></p>\n\
                 <p>After authorization, you will be redirected to <code>{}</code>.</p>",
                encode_double_quoted_attribute(&url),
                CALLBACK_PATH
            )),
        ),
        Err(e) => {
            error!("Cannot build consent URL: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("<p>Error: {}</p>", encode_text(&e.to_string()))),
            )
        }
    }
}

#[instrument(skip_all)]
async fn oauth_callback(
    State(state): State<WebState>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, &'static str) {
    let Some(code) = params.code.filter(|code| !code.is_empty()) else {
        warn!("OAuth callback without authorization code");
        return (StatusCode::BAD_REQUEST, "Authorization code not found.");
    };

    if let Err(e) = state.auth.ensure_initialized().await {
        error!("OAuth client could not be initialized: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error: OAuth client could not be initialized. Check the client secret file and server logs.",
        );
    }

    match state.auth.exchange_code(&code).await {
        Ok(_) => {
            info!("Authorization completed through web callback");
            (
                StatusCode::OK,
                "Authorization successful! Tokens stored. You can now use the MCP tools. Return to the terminal where the MCP server is running.",
            )
        }
        Err(e) => {
            error!("Error retrieving access token: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error during authorization. Check server logs.",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::{CredentialStore, SCOPES};
    use crate::test_support::{
        MockTokenServer, authorized_client, sample_token, unconfigured_client,
        write_client_secret,
    };
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn get_page(app: &Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn token_server_ok() -> serde_json::Value {
        serde_json::json!({
            "access_token": "ya29.web",
            "refresh_token": "1//web",
            "expires_in": 3599,
            "token_type": "Bearer"
        })
    }

    #[tokio::test]
    async fn test_home_without_client_secret_reports_configuration_error() {
        let dir = TempDir::new().unwrap();
        let app = router(unconfigured_client(&dir));

        let (status, body) = get_page(&app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("could not be initialized"));
    }

    #[tokio::test]
    async fn test_home_picks_up_new_client_secret_without_restart() {
        let dir = TempDir::new().unwrap();
        let app = router(unconfigured_client(&dir));

        let (status, _) = get_page(&app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        write_client_secret(&dir, None);
        let (status, body) = get_page(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Authorize with Google"));
        assert!(body.contains("https://accounts.google.com/o/oauth2/auth?"));
        assert!(body.contains("prompt=consent"));
    }

    #[tokio::test]
    async fn test_home_when_authorized_reports_status() {
        let dir = TempDir::new().unwrap();
        let app = router(authorized_client(&dir, None, sample_token()).await);

        let (status, body) = get_page(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Authorized!"));
        assert!(body.contains("token.json"));
    }

    #[tokio::test]
    async fn test_callback_without_code_is_bad_request() {
        let server = MockTokenServer::spawn(StatusCode::OK, token_server_ok()).await;
        let dir = TempDir::new().unwrap();
        write_client_secret(&dir, Some(&server.token_uri()));
        let app = router(unconfigured_client(&dir));

        let (status, body) = get_page(&app, CALLBACK_PATH).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Authorization code not found.");

        let (status, _) = get_page(&app, "/oauth2callback?error=access_denied").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(server.hits(), 0);
        assert!(!dir.path().join("token.json").exists());
    }

    #[tokio::test]
    async fn test_callback_exchanges_code_and_persists_tokens() {
        let server = MockTokenServer::spawn(StatusCode::OK, token_server_ok()).await;
        let dir = TempDir::new().unwrap();
        write_client_secret(&dir, Some(&server.token_uri()));
        let auth = unconfigured_client(&dir);
        let app = router(auth.clone());

        let (status, body) = get_page(&app, "/oauth2callback?code=4%2Fabc&scope=x").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Authorization successful"));

        assert!(auth.is_authorized().await);
        let form = server.last_form().await.unwrap();
        assert_eq!(form.get("code").map(String::as_str), Some("4/abc"));
        assert!(dir.path().join("token.json").exists());

        let (status, body) = get_page(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Authorized!"));
    }

    #[tokio::test]
    async fn test_callback_exchange_failure_is_server_error() {
        let server = MockTokenServer::spawn(
            StatusCode::BAD_REQUEST,
            serde_json::json!({"error": "invalid_grant"}),
        )
        .await;
        let dir = TempDir::new().unwrap();
        write_client_secret(&dir, Some(&server.token_uri()));
        let app = router(unconfigured_client(&dir));

        let (status, body) = get_page(&app, "/oauth2callback?code=expired").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error during authorization. Check server logs.");
        assert!(!dir.path().join("token.json").exists());
    }

    #[tokio::test]
    async fn test_callback_without_client_secret_is_server_error() {
        let dir = TempDir::new().unwrap();
        let app = router(unconfigured_client(&dir));

        let (status, _) = get_page(&app, "/oauth2callback?code=abc").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_pages_escape_html() {
        let dir = TempDir::new().unwrap();
        let auth = Arc::new(AuthClient::new(
            CredentialStore::new(dir.path().join("<secret>.json"), dir.path().join("token.json")),
            SCOPES.iter().map(|s| s.to_string()).collect(),
        ));
        let app = router(auth);

        let (status, body) = get_page(&app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("&lt;secret&gt;.json"));
        assert!(!body.contains("<secret>"));
    }

    #[tokio::test]
    async fn test_consent_link_is_attribute_encoded() {
        let dir = TempDir::new().unwrap();
        write_client_secret(&dir, None);
        let app = router(unconfigured_client(&dir));

        let (_, body) = get_page(&app, "/").await;
        assert!(body.contains("access_type=offline&amp;scope="));
    }
}
