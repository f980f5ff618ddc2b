//! Credential store.
//!
//! Reads the OAuth client-secret file (supplied out of band, never written)
//! and reads/writes the token file, which is the only durable state of the
//! server. Both files are JSON.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{AuthError, TokenRecord};
use crate::core::config::OAuthConfig;

/// Google's consent endpoint, used when the client-secret file has no `auth_uri`.
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google's token endpoint, used when the client-secret file has no `token_uri`.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// On-disk layout of the client-secret file.
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    web: Option<WebClientSection>,
}

#[derive(Debug, Deserialize)]
struct WebClientSection {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
    #[serde(default)]
    auth_uri: Option<String>,
    #[serde(default)]
    token_uri: Option<String>,
}

/// Validated OAuth client identity.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    /// First entry of `redirect_uris`.
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecret")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl TryFrom<WebClientSection> for ClientSecret {
    type Error = AuthError;

    fn try_from(web: WebClientSection) -> Result<Self, Self::Error> {
        if web.client_id.trim().is_empty() {
            return Err(AuthError::configuration("missing web.client_id"));
        }
        if web.client_secret.trim().is_empty() {
            return Err(AuthError::configuration("missing web.client_secret"));
        }
        let redirect_uri = web
            .redirect_uris
            .into_iter()
            .find(|uri| !uri.trim().is_empty())
            .ok_or_else(|| AuthError::configuration("missing web.redirect_uris"))?;

        Ok(Self {
            client_id: web.client_id,
            client_secret: web.client_secret,
            redirect_uri,
            auth_uri: web.auth_uri.unwrap_or_else(|| DEFAULT_AUTH_URI.to_string()),
            token_uri: web.token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        })
    }
}

/// Result of a successful [`CredentialStore::load`].
#[derive(Debug, Clone)]
pub struct LoadedCredentials {
    pub secret: ClientSecret,
    /// Previously persisted token record, if one exists.
    pub token: Option<TokenRecord>,
}

/// File-backed store for the client secret and the token record.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    credentials_path: PathBuf,
    token_path: PathBuf,
}

impl CredentialStore {
    /// Create a store over the given file paths.
    pub fn new(credentials_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            token_path: token_path.into(),
        }
    }

    /// Create a store from the OAuth configuration section.
    pub fn from_config(config: &OAuthConfig) -> Self {
        Self::new(&config.credentials_path, &config.token_path)
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Load the client secret and, if present, the saved token record.
    ///
    /// A missing or unreadable token file is not an error; it only means
    /// authorization is still required.
    #[instrument(skip(self), fields(path = %self.credentials_path.display()))]
    pub async fn load(&self) -> Result<LoadedCredentials, AuthError> {
        let content = tokio::fs::read(&self.credentials_path).await.map_err(|e| {
            AuthError::configuration(format!(
                "cannot read client secret file {}: {}",
                self.credentials_path.display(),
                e
            ))
        })?;

        let file: ClientSecretFile = serde_json::from_slice(&content).map_err(|e| {
            AuthError::configuration(format!(
                "invalid client secret file {}: {}",
                self.credentials_path.display(),
                e
            ))
        })?;

        let web = file
            .web
            .ok_or_else(|| AuthError::configuration("missing `web` OAuth client section"))?;
        let secret = ClientSecret::try_from(web)?;
        debug!("Loaded client secret: {:?}", secret);

        let token = self.load_token().await;
        match token {
            Some(_) => info!("Using previously saved tokens from {}", self.token_path.display()),
            None => info!(
                "No usable token file at {}; authorization required",
                self.token_path.display()
            ),
        }

        Ok(LoadedCredentials { secret, token })
    }

    async fn load_token(&self) -> Option<TokenRecord> {
        let content = tokio::fs::read(&self.token_path).await.ok()?;
        match serde_json::from_slice::<TokenRecord>(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    "Ignoring unparseable token file {}: {}",
                    self.token_path.display(),
                    e
                );
                None
            }
        }
    }

    /// Replace the token file with `token`.
    ///
    /// The record is written to a sibling temporary file which is then
    /// renamed over the token file, so readers never see a partial write.
    #[instrument(skip_all, fields(path = %self.token_path.display()))]
    pub async fn save(&self, token: &TokenRecord) -> Result<(), AuthError> {
        let bytes = serde_json::to_vec(token).map_err(std::io::Error::other)?;

        let tmp_path = self.temp_token_path();
        tokio::fs::write(&tmp_path, &bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.token_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        info!("Tokens stored to {}", self.token_path.display());
        Ok(())
    }

    fn temp_token_path(&self) -> PathBuf {
        let mut name = self.token_path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio_test::{assert_err, assert_ok};

    const VALID_SECRET: &str = r#"{
        "web": {
            "client_id": "id.apps.googleusercontent.com",
            "client_secret": "shh",
            "redirect_uris": ["http://localhost:3001/oauth2callback"]
        }
    }"#;

    fn store_in(dir: &TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join("credentials.json"), dir.path().join("token.json"))
    }

    fn sample_token() -> TokenRecord {
        TokenRecord {
            access_token: "ya29.access".to_string(),
            refresh_token: Some("1//refresh".to_string()),
            scope: Some("https://www.googleapis.com/auth/calendar.events".to_string()),
            token_type: "Bearer".to_string(),
            expiry_date: Some(1_704_110_400_000),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let result = store_in(&dir).load().await;
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_load_without_token_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("credentials.json"), VALID_SECRET).unwrap();

        let loaded = store_in(&dir).load().await.unwrap();
        assert_eq!(loaded.secret.client_id, "id.apps.googleusercontent.com");
        assert_eq!(loaded.secret.redirect_uri, "http://localhost:3001/oauth2callback");
        assert_eq!(loaded.secret.auth_uri, DEFAULT_AUTH_URI);
        assert_eq!(loaded.secret.token_uri, DEFAULT_TOKEN_URI);
        assert!(loaded.token.is_none());
    }

    #[tokio::test]
    async fn test_load_rejects_incomplete_secrets() {
        let cases = [
            r#"{"installed": {"client_id": "a", "client_secret": "b"}}"#,
            r#"{"web": {"client_secret": "b", "redirect_uris": ["http://x"]}}"#,
            r#"{"web": {"client_id": "a", "redirect_uris": ["http://x"]}}"#,
            r#"{"web": {"client_id": "a", "client_secret": "b", "redirect_uris": []}}"#,
            r#"not json"#,
        ];

        for case in cases {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("credentials.json"), case).unwrap();
            let result = store_in(&dir).load().await;
            assert!(
                matches!(result, Err(AuthError::Configuration(_))),
                "expected configuration error for {}",
                case
            );
        }
    }

    #[tokio::test]
    async fn test_unparseable_token_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("credentials.json"), VALID_SECRET).unwrap();
        std::fs::write(dir.path().join("token.json"), "{ broken").unwrap();

        let loaded = assert_ok!(store_in(&dir).load().await);
        assert!(loaded.token.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("credentials.json"), VALID_SECRET).unwrap();
        let store = store_in(&dir);

        store.save(&sample_token()).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.token, Some(sample_token()));
        assert!(!dir.path().join("token.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&sample_token()).await.unwrap();
        let first = std::fs::read(store.token_path()).unwrap();
        store.save(&sample_token()).await.unwrap();
        let second = std::fs::read(store.token_path()).unwrap();

        assert_eq!(first, second);
        let parsed: TokenRecord = serde_json::from_slice(&second).unwrap();
        assert_eq!(parsed, sample_token());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save(&sample_token()).await.unwrap();
        let mut newer = sample_token();
        newer.access_token = "ya29.newer".to_string();
        newer.refresh_token = None;
        store.save(&newer).await.unwrap();

        let parsed: TokenRecord =
            serde_json::from_slice(&std::fs::read(store.token_path()).unwrap()).unwrap();
        assert_eq!(parsed, newer);
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(
            dir.path().join("credentials.json"),
            dir.path().join("missing").join("token.json"),
        );
        assert_err!(store.save(&sample_token()).await);
    }
}
