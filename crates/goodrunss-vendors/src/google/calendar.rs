// ABOUTME: Google Calendar v3 client for the user's primary calendar
// ABOUTME: Creates, lists, and deletes events with reminder defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::circuit_breaker::CircuitBreaker;
use crate::errors::VendorError;
use crate::http_client::{check_status, normalize_base_url, read_json, shared_client};

const VENDOR: &str = "Google Calendar";

/// Production Calendar API base URL
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Scopes requested when connecting Google Calendar
pub const CALENDAR_SCOPES: [&str; 1] = ["https://www.googleapis.com/auth/calendar"];

/// Event to insert into the primary calendar
#[derive(Debug, Clone)]
pub struct NewCalendarEvent {
    /// Event title
    pub summary: String,
    /// Event body
    pub description: Option<String>,
    /// Free-form location
    pub location: Option<String>,
    /// Start instant
    pub start: DateTime<Utc>,
    /// End instant
    pub end: DateTime<Utc>,
    /// IANA time zone used to display the event
    pub time_zone: String,
    /// Attendee email addresses
    pub attendees: Vec<String>,
    /// Minutes before start for the email reminder
    pub email_reminder_minutes: u32,
    /// Minutes before start for the popup reminder
    pub popup_reminder_minutes: u32,
}

impl NewCalendarEvent {
    fn to_request_body(&self) -> serde_json::Value {
        let attendees: Vec<_> = self
            .attendees
            .iter()
            .map(|email| serde_json::json!({ "email": email }))
            .collect();

        serde_json::json!({
            "summary": self.summary,
            "description": self.description,
            "location": self.location,
            "start": {
                "dateTime": format_instant(self.start),
                "timeZone": self.time_zone,
            },
            "end": {
                "dateTime": format_instant(self.end),
                "timeZone": self.time_zone,
            },
            "attendees": attendees,
            "reminders": {
                "useDefault": false,
                "overrides": [
                    { "method": "email", "minutes": self.email_reminder_minutes },
                    { "method": "popup", "minutes": self.popup_reminder_minutes },
                ],
            },
        })
    }
}

/// Start or end of an event (timed or all-day)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventTime {
    /// RFC 3339 timestamp for timed events
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// Calendar date for all-day events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Event resource returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Event id
    pub id: String,
    /// Event title
    pub summary: Option<String>,
    /// Event body
    pub description: Option<String>,
    /// Free-form location
    pub location: Option<String>,
    /// Start time
    #[serde(default)]
    pub start: EventTime,
    /// End time
    #[serde(default)]
    pub end: EventTime,
    /// Link to the event in the Calendar UI
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
    /// `confirmed`, `tentative`, or `cancelled`
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<CalendarEvent>,
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Calendar client authenticated per call with the user's access token
#[derive(Debug)]
pub struct CalendarClient {
    base_url: String,
    breaker: CircuitBreaker,
}

impl Default for CalendarClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarClient {
    /// Create a client against the production API
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: CALENDAR_API_BASE.to_owned(),
            breaker: CircuitBreaker::new(VENDOR),
        }
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Insert an event into the primary calendar
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if the token is rejected or the event is invalid
    #[instrument(skip(self, access_token, event), fields(vendor = VENDOR))]
    pub async fn insert_event(
        &self,
        access_token: &str,
        event: &NewCalendarEvent,
    ) -> Result<CalendarEvent, VendorError> {
        let body = event.to_request_body();

        let created: CalendarEvent = self
            .breaker
            .call(async {
                let response = shared_client()
                    .post(format!("{}/calendars/primary/events", self.base_url))
                    .bearer_auth(access_token)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;

        info!(event_id = %created.id, "Calendar event created");
        Ok(created)
    }

    /// List single events in a time window ordered by start time
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if the token is rejected or Google fails
    #[instrument(skip(self, access_token), fields(vendor = VENDOR))]
    pub async fn list_events(
        &self,
        access_token: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<CalendarEvent>, VendorError> {
        let params = [
            ("timeMin", format_instant(time_min)),
            ("timeMax", format_instant(time_max)),
            ("maxResults", max_results.to_string()),
            ("singleEvents", "true".to_owned()),
            ("orderBy", "startTime".to_owned()),
        ];

        let list: EventList = self
            .breaker
            .call(async {
                let response = shared_client()
                    .get(format!("{}/calendars/primary/events", self.base_url))
                    .bearer_auth(access_token)
                    .query(&params)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;
        Ok(list.items)
    }

    /// Delete an event from the primary calendar
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if the event does not exist or Google fails
    #[instrument(skip(self, access_token), fields(vendor = VENDOR))]
    pub async fn delete_event(&self, access_token: &str, event_id: &str) -> Result<(), VendorError> {
        self.breaker
            .call(async {
                let response = shared_client()
                    .delete(format!(
                        "{}/calendars/primary/events/{event_id}",
                        self.base_url
                    ))
                    .bearer_auth(access_token)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                check_status(VENDOR, response).await.map(|_| ())
            })
            .await
    }
}
