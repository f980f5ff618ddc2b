//! Calendar domain.
//!
//! - `api.rs` - remote Calendar API trait and its Google REST implementation
//! - `models.rs` - wire models, day queries and result types
//! - `service.rs` - list-by-date and create-event operations
//! - `error.rs` - calendar error types

pub mod api;
mod error;
pub mod models;
pub mod service;

pub use api::{CalendarApi, GoogleCalendarApi};
pub use error::CalendarError;
pub use models::{
    CreatedEvent, EventDateTime, EventList, EventQuery, EventRequest, MeetingSummary, NewEvent,
    RemoteEvent,
};
pub use service::CalendarService;
