//! Authorization domain.
//!
//! - `credentials.rs` - client-secret file and token file I/O
//! - `token.rs` - persisted token record and token endpoint responses
//! - `client.rs` - OAuth 2.0 authorization-code client holding the session
//! - `error.rs` - authorization error types

pub mod client;
pub mod credentials;
mod error;
pub mod token;

pub use client::{AuthClient, build_consent_url};
pub use credentials::{ClientSecret, CredentialStore, LoadedCredentials};
pub use error::AuthError;
pub use token::{TokenRecord, TokenResponse};

/// OAuth scopes requested by the consent URL.
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/calendar.readonly",
    "https://www.googleapis.com/auth/calendar.events",
];
