// ABOUTME: Stored vendor integrations, virtual sessions, and SMS logs
// ABOUTME: Google credentials are kept as JSON in the email and calendar integration tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, Utc};
use goodrunss_vendors::google::GoogleCredentials;
use serde::{Deserialize, Serialize};

/// Table that holds a Google integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationProvider {
    /// `email_integrations` with provider `gmail`
    Gmail,
    /// `calendar_integrations` with provider `google_calendar`
    GoogleCalendar,
}

impl IntegrationProvider {
    /// Provider column value
    #[must_use]
    pub const fn provider(self) -> &'static str {
        match self {
            Self::Gmail => "gmail",
            Self::GoogleCalendar => "google_calendar",
        }
    }

    /// Backing table
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Gmail => "email_integrations",
            Self::GoogleCalendar => "calendar_integrations",
        }
    }
}

/// Connected Google account for Gmail or Calendar
#[derive(Debug, Clone)]
pub struct StoredGoogleIntegration {
    /// Primary key
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Decoded OAuth credentials
    pub credentials: GoogleCredentials,
    /// Connection time
    pub connected_at: DateTime<Utc>,
}

/// Connected social account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialIntegration {
    /// Primary key
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// `instagram`
    pub provider: String,
    /// Graph API token
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Account id on the provider
    pub provider_user_id: Option<String>,
    /// Account handle on the provider
    pub provider_username: Option<String>,
    /// Connection time
    pub connected_at: DateTime<Utc>,
}

/// Connected Zoom account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoomIntegration {
    /// Primary key
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Zoom OAuth token
    #[serde(skip_serializing)]
    pub access_token: String,
    /// Zoom user id
    pub zoom_user_id: Option<String>,
    /// Zoom account email
    pub email: Option<String>,
    /// Connection time
    pub connected_at: DateTime<Utc>,
}

/// Training session hosted over Zoom
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VirtualSession {
    /// Primary key
    pub id: i64,
    /// Booking user
    pub user_id: i64,
    /// Trainer display name
    pub trainer_name: String,
    /// `training`, `consultation` or `group`
    pub session_type: Option<String>,
    /// Scheduled start
    pub start_time: DateTime<Utc>,
    /// Length in minutes
    pub duration_minutes: i64,
    /// Zoom meeting id
    pub zoom_meeting_id: Option<String>,
    /// Participant link
    pub zoom_join_url: Option<String>,
    /// Host link
    pub zoom_start_url: Option<String>,
    /// Price in dollars
    pub price: Option<f64>,
    /// `scheduled`, `in_progress`, `completed` or `cancelled`
    pub status: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Outbound SMS record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmsLog {
    /// Primary key
    pub id: i64,
    /// Sending user
    pub user_id: i64,
    /// Recipient
    pub phone_number: String,
    /// Message body
    pub message: String,
    /// Twilio message SID
    pub twilio_sid: Option<String>,
    /// Twilio delivery status
    pub status: Option<String>,
    /// Send time
    pub sent_at: DateTime<Utc>,
}

/// Fields stored for a newly scheduled virtual session
#[derive(Debug, Clone)]
pub struct NewVirtualSession {
    /// Booking user
    pub user_id: i64,
    /// Trainer display name
    pub trainer_name: String,
    /// Session kind
    pub session_type: Option<String>,
    /// Scheduled start
    pub start_time: DateTime<Utc>,
    /// Length in minutes
    pub duration_minutes: i64,
    /// Zoom meeting id
    pub zoom_meeting_id: String,
    /// Participant link
    pub zoom_join_url: String,
    /// Host link
    pub zoom_start_url: String,
    /// Price in dollars
    pub price: Option<f64>,
}
