// ABOUTME: Zoom REST client for verifying accounts and scheduling meetings
// ABOUTME: Creates scheduled meetings configured for one-on-one training sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::circuit_breaker::CircuitBreaker;
use crate::errors::VendorError;
use crate::http_client::{normalize_base_url, read_json, shared_client};

const VENDOR: &str = "Zoom";

/// Production Zoom API base URL
pub const ZOOM_API_BASE: &str = "https://api.zoom.us/v2";

/// Zoom meeting type for a scheduled meeting
const SCHEDULED_MEETING: u8 = 2;

/// Account behind an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomUser {
    /// Zoom user id
    pub id: String,
    /// Account email
    pub email: Option<String>,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
}

/// Meeting to schedule
#[derive(Debug, Clone)]
pub struct NewMeeting {
    /// Meeting topic
    pub topic: String,
    /// Start instant
    pub start_time: DateTime<Utc>,
    /// Length in minutes
    pub duration_minutes: u32,
    /// IANA time zone shown to participants
    pub time_zone: String,
}

/// Meeting resource returned after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomMeeting {
    /// Numeric meeting id
    pub id: i64,
    /// Participant join link
    pub join_url: String,
    /// Host start link
    pub start_url: String,
    /// Meeting topic
    pub topic: Option<String>,
}

/// Zoom client authenticated per call with the user's token
#[derive(Debug)]
pub struct ZoomClient {
    base_url: String,
    breaker: CircuitBreaker,
}

impl Default for ZoomClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomClient {
    /// Create a client against the production API
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: ZOOM_API_BASE.to_owned(),
            breaker: CircuitBreaker::new(VENDOR),
        }
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Resolve the account that owns `access_token`
    ///
    /// # Errors
    ///
    /// Returns `VendorError::AuthFailed` if the token is invalid
    #[instrument(skip_all, fields(vendor = VENDOR))]
    pub async fn current_user(&self, access_token: &str) -> Result<ZoomUser, VendorError> {
        self.breaker
            .call(async {
                let response = shared_client()
                    .get(format!("{}/users/me", self.base_url))
                    .bearer_auth(access_token)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await
    }

    /// Schedule a meeting hosted by `zoom_user_id`
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if Zoom refuses the meeting
    #[instrument(skip(self, access_token, meeting), fields(vendor = VENDOR))]
    pub async fn create_meeting(
        &self,
        access_token: &str,
        zoom_user_id: &str,
        meeting: &NewMeeting,
    ) -> Result<ZoomMeeting, VendorError> {
        let body = serde_json::json!({
            "topic": meeting.topic,
            "type": SCHEDULED_MEETING,
            "start_time": meeting.start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
            "duration": meeting.duration_minutes,
            "timezone": meeting.time_zone,
            "settings": {
                "host_video": true,
                "participant_video": true,
                "join_before_host": false,
                "mute_upon_entry": true,
                "waiting_room": true,
            },
        });

        let created: ZoomMeeting = self
            .breaker
            .call(async {
                let response = shared_client()
                    .post(format!("{}/users/{zoom_user_id}/meetings", self.base_url))
                    .bearer_auth(access_token)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;

        info!(meeting_id = created.id, "Zoom meeting created");
        Ok(created)
    }
}
