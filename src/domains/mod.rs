//! Domains module containing business logic organized by bounded contexts.
//!
//! - **auth**: OAuth client credentials, token persistence, code exchange and refresh
//! - **calendar**: Google Calendar access for listing and inserting events
//! - **tools**: MCP tools exposed to clients
//! - **web**: local HTTP endpoint completing the authorization flow

pub mod auth;
pub mod calendar;
pub mod tools;
pub mod web;
