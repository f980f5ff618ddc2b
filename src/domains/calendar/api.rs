//! Remote Calendar API access.
//!
//! [`CalendarApi`] is the seam between calendar operations and the remote
//! service; [`GoogleCalendarApi`] is the REST implementation over reqwest.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{CalendarError, EventList, EventQuery, NewEvent, RemoteEvent};
use crate::core::config::CalendarConfig;

/// Remote calendar service with list and insert operations.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// List events of `calendar_id` matching `query`.
    async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        query: &EventQuery,
    ) -> Result<Vec<RemoteEvent>, CalendarError>;

    /// Insert `event` into `calendar_id`, returning the created resource.
    async fn insert_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<RemoteEvent, CalendarError>;
}

/// Google Calendar v3 REST client.
#[derive(Debug, Clone)]
pub struct GoogleCalendarApi {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

impl GoogleCalendarApi {
    /// Create a client rooted at `base_url`, e.g. `https://www.googleapis.com/calendar/v3`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Self {
        Self::new(&config.api_base_url)
    }

    /// `{base}/calendars/{calendar_id}/events`, with the id percent-encoded.
    fn events_url(&self, calendar_id: &str) -> Result<Url, CalendarError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            CalendarError::unreachable(format!("invalid API base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                CalendarError::unreachable(format!("invalid API base URL {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);
        Ok(url)
    }

    /// Turn a non-success response into an upstream error carrying the API message.
    async fn check(response: Response) -> Result<Response, CalendarError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|b| b.error.message)
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        Err(CalendarError::upstream(status.as_u16(), message))
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarApi {
    #[instrument(skip(self, access_token, query), fields(time_min = %query.time_min))]
    async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        query: &EventQuery,
    ) -> Result<Vec<RemoteEvent>, CalendarError> {
        let url = self.events_url(calendar_id)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(|e| CalendarError::unreachable(format!("Failed to fetch events: {}", e)))?;

        let list: EventList = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| {
                CalendarError::unreachable(format!("Failed to parse events response: {}", e))
            })?;

        debug!("Calendar API returned {} event(s)", list.items.len());
        Ok(list.items)
    }

    #[instrument(skip(self, access_token, event), fields(summary = %event.summary))]
    async fn insert_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<RemoteEvent, CalendarError> {
        let url = self.events_url(calendar_id)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| CalendarError::unreachable(format!("Failed to insert event: {}", e)))?;

        Self::check(response).await?.json().await.map_err(|e| {
            CalendarError::unreachable(format!("Failed to parse insert response: {}", e))
        })
    }
}
