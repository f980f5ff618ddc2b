//! Calendar operations: listing a day's events and creating an event.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use tracing::{info, instrument, warn};

use super::{
    CalendarApi, CalendarError, CreatedEvent, EventDateTime, EventQuery, EventRequest,
    MeetingSummary, NewEvent,
};
use crate::domains::auth::{AuthClient, AuthError};

/// Upper bound on events returned for one day. No pagination is performed.
pub const MAX_RESULTS: u32 = 10;

/// Offset appended to local date/time input when creating events.
pub const EVENT_UTC_OFFSET: &str = "+06:00";

/// Time zone label attached to created events; matches [`EVENT_UTC_OFFSET`].
pub const EVENT_TIME_ZONE: &str = "Asia/Dhaka";

/// Environment variable naming the target calendar, read on every call.
pub const CALENDAR_ID_VAR: &str = "CALENDAR_ID";

/// Calendar used when [`CALENDAR_ID_VAR`] is unset.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

const UNTITLED: &str = "(No title)";

/// Calendar operations over an authorized client.
///
/// A request rejected with HTTP 401 triggers exactly one token refresh and
/// one retry. No other failure is retried.
pub struct CalendarService {
    auth: Arc<AuthClient>,
    api: Arc<dyn CalendarApi>,
}

impl CalendarService {
    pub fn new(auth: Arc<AuthClient>, api: Arc<dyn CalendarApi>) -> Self {
        Self { auth, api }
    }

    /// Events starting on the UTC day `date`, ordered by start time.
    ///
    /// An empty day yields an empty list.
    #[instrument(skip(self))]
    pub async fn list_events_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<MeetingSummary>, CalendarError> {
        let query = EventQuery::for_day(date, MAX_RESULTS);
        let calendar_id = calendar_id();

        let token = self.access_token().await?;
        let events = match self.api.list_events(&token, &calendar_id, &query).await {
            Err(e) if e.is_unauthorized() => {
                warn!("Access token rejected; refreshing once");
                let token = self.auth.refresh(&token).await?;
                self.api.list_events(&token, &calendar_id, &query).await?
            }
            other => other?,
        };

        let meetings: Vec<MeetingSummary> = events
            .into_iter()
            .filter(|event| query.contains_start(event))
            .filter_map(|event| {
                let start = event.start.as_ref()?.display()?.to_string();
                Some(MeetingSummary {
                    summary: event.summary.unwrap_or_else(|| UNTITLED.to_string()),
                    start,
                })
            })
            .collect();

        info!("Found {} event(s) on {}", meetings.len(), date);
        Ok(meetings)
    }

    /// Create an event from local date and time fields at [`EVENT_UTC_OFFSET`].
    ///
    /// Both instants are validated before any network call. The returned
    /// start and end are the constructed instants.
    #[instrument(skip(self, request), fields(summary = %request.summary))]
    pub async fn create_event(&self, request: &EventRequest) -> Result<CreatedEvent, CalendarError> {
        let start = build_instant(&request.start_date, &request.start_time)?;
        let end = build_instant(&request.end_date, &request.end_time)?;

        let event = NewEvent {
            summary: request.summary.clone(),
            description: request.description.clone(),
            location: request.location.clone(),
            start: EventDateTime::timed(&start, EVENT_TIME_ZONE),
            end: EventDateTime::timed(&end, EVENT_TIME_ZONE),
        };
        let calendar_id = calendar_id();

        let token = self.access_token().await?;
        let created = match self.api.insert_event(&token, &calendar_id, &event).await {
            Err(e) if e.is_unauthorized() => {
                warn!("Access token rejected; refreshing once");
                let token = self.auth.refresh(&token).await?;
                self.api.insert_event(&token, &calendar_id, &event).await?
            }
            other => other?,
        };

        let html_link = created.html_link.unwrap_or_default();
        info!("Event created: {}", html_link);
        Ok(CreatedEvent {
            event_id: created.id.unwrap_or_default(),
            html_link,
            summary: created.summary.unwrap_or(event.summary),
            start,
            end,
        })
    }
}

impl CalendarService {
    /// Current access token. With no token held the call is rejected as an
    /// upstream error before anything is sent.
    async fn access_token(&self) -> Result<String, CalendarError> {
        self.auth.access_token().await.map_err(|e| match e {
            AuthError::NotAuthorized => CalendarError::not_authorized(),
            other => other.into(),
        })
    }
}

/// Join `YYYY-MM-DD` and `HH:MM` into an RFC 3339 instant at [`EVENT_UTC_OFFSET`].
pub fn build_instant(date: &str, time: &str) -> Result<String, CalendarError> {
    let instant = format!("{}T{}:00{}", date.trim(), time.trim(), EVENT_UTC_OFFSET);
    DateTime::parse_from_rfc3339(&instant).map_err(|_| {
        CalendarError::validation(format!(
            "'{} {}' is not a valid date and time. Please use YYYY-MM-DD for date and HH:MM for time.",
            date, time
        ))
    })?;
    Ok(instant)
}

fn calendar_id() -> String {
    std::env::var(CALENDAR_ID_VAR)
        .ok()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string())
}
