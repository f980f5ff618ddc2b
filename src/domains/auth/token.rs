//! OAuth token record and token endpoint response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds assumed for `expires_in` when the token endpoint omits it.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// The persisted token record.
///
/// Written wholesale to the token file after every successful code exchange
/// or refresh. `expiry_date` is milliseconds since the Unix epoch.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenRecord {
    /// Whether the record carries a usable access token.
    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Whether the recorded expiry is at or before `now`.
    ///
    /// Records without an expiry never count as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date
            .is_some_and(|expiry| expiry <= now.timestamp_millis())
    }
}

/// Redacts credentials from debug output.
impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRecord")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .field("expiry_date", &self.expiry_date)
            .finish()
    }
}

/// Body returned by the OAuth token endpoint for both grant types.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Convert into a token record issued at `now`.
    ///
    /// Refresh responses usually omit `refresh_token`; `previous_refresh`
    /// is carried over in that case.
    pub fn into_record(
        self,
        now: DateTime<Utc>,
        previous_refresh: Option<String>,
    ) -> TokenRecord {
        let expires_in = self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        TokenRecord {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            scope: self.scope,
            token_type: self.token_type.unwrap_or_else(default_token_type),
            expiry_date: Some(now.timestamp_millis() + expires_in * 1000),
        }
    }
}
