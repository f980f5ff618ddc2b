//! Shared fixtures for unit tests: credential files, a mock OAuth token
//! endpoint and an in-memory Calendar API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Form, Json, Router, extract::State, http::StatusCode, routing::post};
use tempfile::TempDir;

use crate::domains::auth::{AuthClient, CredentialStore, SCOPES, TokenRecord};
use crate::domains::calendar::{
    CalendarApi, CalendarError, EventDateTime, EventQuery, NewEvent, RemoteEvent,
};

pub const TEST_CLIENT_ID: &str = "test-client.apps.googleusercontent.com";

pub fn write_client_secret(dir: &TempDir, token_uri: Option<&str>) {
    let mut web = serde_json::json!({
        "client_id": TEST_CLIENT_ID,
        "client_secret": "test-secret",
        "redirect_uris": ["http://localhost:3001/oauth2callback"]
    });
    if let Some(uri) = token_uri {
        web["token_uri"] = serde_json::json!(uri);
    }
    std::fs::write(
        dir.path().join("credentials.json"),
        serde_json::json!({ "web": web }).to_string(),
    )
    .unwrap();
}

pub fn sample_token() -> TokenRecord {
    TokenRecord {
        access_token: "ya29.saved".to_string(),
        refresh_token: Some("1//saved".to_string()),
        scope: Some(SCOPES.join(" ")),
        token_type: "Bearer".to_string(),
        expiry_date: None,
    }
}

pub fn store_in(dir: &TempDir) -> CredentialStore {
    CredentialStore::new(dir.path().join("credentials.json"), dir.path().join("token.json"))
}

fn scopes() -> Vec<String> {
    SCOPES.iter().map(|s| s.to_string()).collect()
}

/// Client initialized from files holding a client secret and `token`.
pub async fn authorized_client(
    dir: &TempDir,
    token_uri: Option<&str>,
    token: TokenRecord,
) -> Arc<AuthClient> {
    write_client_secret(dir, token_uri);
    std::fs::write(dir.path().join("token.json"), serde_json::to_vec(&token).unwrap()).unwrap();
    let client = AuthClient::new(store_in(dir), scopes());
    client.initialize().await.unwrap();
    Arc::new(client)
}

/// Client initialized from a client secret with no saved token.
pub async fn unauthorized_client(dir: &TempDir) -> Arc<AuthClient> {
    write_client_secret(dir, None);
    let client = AuthClient::new(store_in(dir), scopes());
    client.initialize().await.unwrap();
    Arc::new(client)
}

/// Client whose client-secret file does not exist.
pub fn unconfigured_client(dir: &TempDir) -> Arc<AuthClient> {
    Arc::new(AuthClient::new(store_in(dir), scopes()))
}

// ============================================================================
// Mock token endpoint
// ============================================================================

struct TokenServerState {
    status: StatusCode,
    body: serde_json::Value,
    hits: AtomicUsize,
    last_form: tokio::sync::Mutex<Option<HashMap<String, String>>>,
}

/// OAuth token endpoint on `127.0.0.1` answering every request with a fixed response.
pub struct MockTokenServer {
    addr: SocketAddr,
    state: Arc<TokenServerState>,
}

impl MockTokenServer {
    pub async fn spawn(status: StatusCode, body: serde_json::Value) -> Self {
        let state = Arc::new(TokenServerState {
            status,
            body,
            hits: AtomicUsize::new(0),
            last_form: tokio::sync::Mutex::new(None),
        });
        let app = Router::new()
            .route("/token", post(token_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn token_uri(&self) -> String {
        format!("http://{}/token", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub async fn last_form(&self) -> Option<HashMap<String, String>> {
        self.state.last_form.lock().await.clone()
    }
}

async fn token_handler(
    State(state): State<Arc<TokenServerState>>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_form.lock().await = Some(form);
    (state.status, Json(state.body.clone()))
}

// ============================================================================
// Mock Calendar API
// ============================================================================

pub fn timed_event(summary: &str, start: &str) -> RemoteEvent {
    RemoteEvent {
        id: Some(format!("id-{}", summary)),
        summary: Some(summary.to_string()),
        html_link: None,
        start: Some(EventDateTime {
            date_time: Some(start.to_string()),
            ..Default::default()
        }),
        end: None,
    }
}

/// In-memory Calendar API that records every call.
#[derive(Default)]
pub struct MockCalendarApi {
    events: Vec<RemoteEvent>,
    rejections: AtomicUsize,
    failure: Mutex<Option<(u16, String)>>,
    list_calls: Mutex<Vec<(String, EventQuery)>>,
    insert_calls: Mutex<Vec<(String, NewEvent)>>,
}

impl MockCalendarApi {
    /// Mock whose list call returns `events` unfiltered.
    pub fn with_events(events: Vec<RemoteEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    /// Reject the next `count` calls with HTTP 401.
    pub fn reject_next_tokens(&self, count: usize) {
        self.rejections.store(count, Ordering::SeqCst);
    }

    /// Fail every call with the given status and message.
    pub fn fail_with(&self, status: u16, message: &str) {
        *self.failure.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn list_calls(&self) -> Vec<(String, EventQuery)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn insert_calls(&self) -> Vec<(String, NewEvent)> {
        self.insert_calls.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<(), CalendarError> {
        let rejected = self
            .rejections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(CalendarError::upstream(401, "Invalid Credentials"));
        }
        match self.failure.lock().unwrap().clone() {
            Some((status, message)) => Err(CalendarError::upstream(status, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CalendarApi for MockCalendarApi {
    async fn list_events(
        &self,
        access_token: &str,
        _calendar_id: &str,
        query: &EventQuery,
    ) -> Result<Vec<RemoteEvent>, CalendarError> {
        self.list_calls
            .lock()
            .unwrap()
            .push((access_token.to_string(), query.clone()));
        self.outcome()?;
        Ok(self.events.clone())
    }

    async fn insert_event(
        &self,
        access_token: &str,
        _calendar_id: &str,
        event: &NewEvent,
    ) -> Result<RemoteEvent, CalendarError> {
        let count = {
            let mut calls = self.insert_calls.lock().unwrap();
            calls.push((access_token.to_string(), event.clone()));
            calls.len()
        };
        self.outcome()?;
        let id = format!("mock-event-{}", count);
        Ok(RemoteEvent {
            html_link: Some(format!("https://www.google.com/calendar/event?eid={}", id)),
            id: Some(id),
            summary: Some(event.summary.clone()),
            start: Some(event.start.clone()),
            end: Some(event.end.clone()),
        })
    }
}
