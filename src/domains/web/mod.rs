//! Web domain.
//!
//! Local HTTP endpoint that drives the OAuth authorization-code flow:
//! a status page with the consent link and the redirect callback.

pub mod routes;
pub mod server;

pub use routes::{CALLBACK_PATH, router};
pub use server::WebServer;
