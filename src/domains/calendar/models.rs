//! Calendar API wire models and tool-facing result types.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Start or end of an event: either a timed instant or an all-day date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    /// A timed instant with an explicit time zone label.
    pub fn timed(date_time: impl Into<String>, time_zone: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            date: None,
            time_zone: Some(time_zone.into()),
        }
    }

    /// Display value, preferring the timed instant over the all-day date.
    pub fn display(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }
}

/// Event resource as returned by the Calendar API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub html_link: Option<String>,
    #[serde(default)]
    pub start: Option<EventDateTime>,
    #[serde(default)]
    pub end: Option<EventDateTime>,
}

/// Body of an events list response.
#[derive(Debug, Default, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<RemoteEvent>,
}

/// Body of an events insert request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Query for the events list endpoint over the half-open interval
/// `[time_min, time_max)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub day: NaiveDate,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub max_results: u32,
    /// Expand recurring events into their individual instances.
    pub single_events: bool,
    pub order_by: &'static str,
}

impl EventQuery {
    /// Query covering the UTC day `date`, `[00:00:00.000Z, next day 00:00:00.000Z)`.
    pub fn for_day(date: NaiveDate, max_results: u32) -> Self {
        let time_min = date.and_time(NaiveTime::MIN).and_utc();
        let next_day = date.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
        let time_max = next_day.and_time(NaiveTime::MIN).and_utc();
        Self {
            day: date,
            time_min,
            time_max,
            max_results,
            single_events: true,
            order_by: "startTime",
        }
    }

    /// Query string parameters for the events list endpoint.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("timeMin", format_utc(self.time_min)),
            ("timeMax", format_utc(self.time_max)),
            ("maxResults", self.max_results.to_string()),
            ("singleEvents", self.single_events.to_string()),
            ("orderBy", self.order_by.to_string()),
        ]
    }

    /// Whether `event` starts inside the queried interval.
    ///
    /// Timed starts must fall in `[time_min, time_max)`; all-day events must
    /// be dated on the queried day. Events without a start never match.
    pub fn contains_start(&self, event: &RemoteEvent) -> bool {
        let Some(start) = event.start.as_ref() else {
            return false;
        };
        if let Some(date_time) = start.date_time.as_deref() {
            return match DateTime::parse_from_rfc3339(date_time) {
                Ok(instant) => {
                    let instant = instant.with_timezone(&Utc);
                    instant >= self.time_min && instant < self.time_max
                }
                Err(_) => false,
            };
        }
        start
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .is_some_and(|d| d == self.day)
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Input for creating an event from separate date and time fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    pub summary: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `HH:MM`, 24-hour
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// One entry of a date listing: title plus display start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingSummary {
    pub summary: String,
    pub start: String,
}

/// Result of a successful event insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub event_id: String,
    pub html_link: String,
    pub summary: String,
    pub start: String,
    pub end: String,
}
