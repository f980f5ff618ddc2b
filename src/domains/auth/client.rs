//! Authorization client.
//!
//! Single owner of the in-memory OAuth state (client identity plus current
//! token record). Both the web endpoint and the calendar tools hold an
//! `Arc<AuthClient>`; nothing else reads or writes the token.
//!
//! State machine: `Unauthorized -> Authorized` only through a successful
//! code exchange. Re-authorization re-enters `Authorized` directly.

use chrono::Utc;
use reqwest::Client;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use super::credentials::{ClientSecret, CredentialStore};
use super::{AuthError, TokenRecord, TokenResponse};

#[derive(Debug, Clone)]
struct Session {
    secret: ClientSecret,
    token: Option<TokenRecord>,
}

/// OAuth 2.0 authorization-code client with file-backed token persistence.
pub struct AuthClient {
    store: CredentialStore,
    scopes: Vec<String>,
    http: Client,
    session: RwLock<Option<Session>>,
    /// Serializes code exchange and refresh so only one token-endpoint
    /// round trip mutates the session at a time.
    flow: Mutex<()>,
}

impl AuthClient {
    /// Create an uninitialized client. Call [`AuthClient::initialize`] to load
    /// the client secret and any saved token.
    pub fn new(store: CredentialStore, scopes: Vec<String>) -> Self {
        Self {
            store,
            scopes,
            http: Client::new(),
            session: RwLock::new(None),
            flow: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// (Re)load the client secret and saved token from the credential store.
    ///
    /// On failure the client is left uninitialized. Holds the flow lock so a
    /// reload never interleaves with an exchange or refresh.
    pub async fn initialize(&self) -> Result<(), AuthError> {
        let _flow = self.flow.lock().await;
        match self.store.load().await {
            Ok(loaded) => {
                *self.session.write().await = Some(Session {
                    secret: loaded.secret,
                    token: loaded.token,
                });
                Ok(())
            }
            Err(e) => {
                *self.session.write().await = None;
                Err(e)
            }
        }
    }

    /// Initialize only if no client identity is loaded yet.
    pub async fn ensure_initialized(&self) -> Result<(), AuthError> {
        if self.is_initialized().await {
            return Ok(());
        }
        self.initialize().await
    }

    pub async fn is_initialized(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// True iff an access token is held. Expiry is not checked here.
    pub async fn is_authorized(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.token.as_ref())
            .is_some_and(TokenRecord::has_access_token)
    }

    /// Consent URL for the loaded client identity.
    pub async fn consent_url(&self) -> Result<String, AuthError> {
        let session = self.session.read().await;
        let session = session
            .as_ref()
            .ok_or_else(|| AuthError::configuration("OAuth client is not initialized"))?;
        build_consent_url(&session.secret, &self.scopes)
    }

    /// Trade an authorization code for tokens, then persist them.
    #[instrument(skip_all)]
    pub async fn exchange_code(&self, code: &str) -> Result<TokenRecord, AuthError> {
        self.ensure_initialized().await?;
        let _flow = self.flow.lock().await;

        let (secret, previous) = self.snapshot().await?;
        let response = self
            .request_token(
                &secret,
                &[
                    ("code", code),
                    ("client_id", secret.client_id.as_str()),
                    ("client_secret", secret.client_secret.as_str()),
                    ("redirect_uri", secret.redirect_uri.as_str()),
                    ("grant_type", "authorization_code"),
                ],
            )
            .await?;

        let record =
            response.into_record(Utc::now(), previous.and_then(|t| t.refresh_token));
        if record.refresh_token.is_none() {
            warn!("Token endpoint issued no refresh token; re-authorization will be needed on expiry");
        }

        self.store.save(&record).await?;
        self.set_token(record.clone()).await;
        info!("Authorization code exchanged");
        Ok(record)
    }

    /// Current access token, refreshing first when the stored expiry has
    /// passed and a refresh token is available.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let token = self
            .session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.token.clone())
            .filter(TokenRecord::has_access_token)
            .ok_or(AuthError::NotAuthorized)?;

        if token.refresh_token.is_some() && token.is_expired_at(Utc::now()) {
            debug!("Stored access token expired");
            return self.refresh(&token.access_token).await;
        }
        Ok(token.access_token)
    }

    /// Mint a new access token from the stored refresh token and persist it.
    ///
    /// `stale_access_token` is the token the caller saw rejected. If another
    /// caller already replaced it, the newer token is returned without a
    /// second round trip.
    #[instrument(skip_all)]
    pub async fn refresh(&self, stale_access_token: &str) -> Result<String, AuthError> {
        let _flow = self.flow.lock().await;

        let (secret, current) = self.snapshot().await?;
        let current = current.ok_or(AuthError::NotAuthorized)?;
        if current.access_token != stale_access_token {
            debug!("Access token already refreshed by another caller");
            return Ok(current.access_token);
        }

        let refresh_token = current.refresh_token.clone().ok_or_else(|| {
            AuthError::authorization("no refresh token stored; re-authorization required")
        })?;

        let response = self
            .request_token(
                &secret,
                &[
                    ("client_id", secret.client_id.as_str()),
                    ("client_secret", secret.client_secret.as_str()),
                    ("refresh_token", refresh_token.as_str()),
                    ("grant_type", "refresh_token"),
                ],
            )
            .await
            .map_err(|e| {
                error!("Token refresh failed: {}", e);
                match e {
                    AuthError::Authorization(msg) => {
                        AuthError::authorization(format!("{}; re-authorization required", msg))
                    }
                    other => other,
                }
            })?;

        let record = response.into_record(Utc::now(), Some(refresh_token));
        let access_token = record.access_token.clone();
        self.store.save(&record).await?;
        self.set_token(record).await;
        info!("Access token refreshed");
        Ok(access_token)
    }

    async fn snapshot(&self) -> Result<(ClientSecret, Option<TokenRecord>), AuthError> {
        let session = self.session.read().await;
        let session = session
            .as_ref()
            .ok_or_else(|| AuthError::configuration("OAuth client is not initialized"))?;
        Ok((session.secret.clone(), session.token.clone()))
    }

    async fn set_token(&self, record: TokenRecord) {
        if let Some(session) = self.session.write().await.as_mut() {
            session.token = Some(record);
        }
    }

    async fn request_token(
        &self,
        secret: &ClientSecret,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(&secret.token_uri)
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::authorization(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(AuthError::authorization(format!(
                "token endpoint returned HTTP {} - {}",
                status, body
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::authorization(format!("invalid token response: {}", e)))
    }
}

/// Build the consent URL requesting offline access and forced consent, so a
/// refresh token is issued even on repeat authorizations.
pub fn build_consent_url(secret: &ClientSecret, scopes: &[String]) -> Result<String, AuthError> {
    let scope = scopes.join(" ");
    let query = serde_urlencoded::to_string([
        ("access_type", "offline"),
        ("scope", scope.as_str()),
        ("prompt", "consent"),
        ("response_type", "code"),
        ("client_id", secret.client_id.as_str()),
        ("redirect_uri", secret.redirect_uri.as_str()),
    ])
    .map_err(|e| AuthError::configuration(format!("cannot encode consent URL: {}", e)))?;

    let separator = if secret.auth_uri.contains('?') { '&' } else { '?' };
    Ok(format!("{}{}{}", secret.auth_uri, separator, query))
}
