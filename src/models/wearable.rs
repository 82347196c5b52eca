// ABOUTME: Wearable device connections and stored health samples
// ABOUTME: Apple Watch, WHOOP, Fitbit, and Garmin device types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use goodrunss_core::errors::AppError;
use serde::{Deserialize, Serialize};

/// Supported wearable devices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// Apple Watch via `HealthKit`
    AppleWatch,
    /// WHOOP strap
    Whoop,
    /// Fitbit tracker
    Fitbit,
    /// Garmin watch
    Garmin,
}

impl DeviceType {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AppleWatch => "apple_watch",
            Self::Whoop => "whoop",
            Self::Fitbit => "fitbit",
            Self::Garmin => "garmin",
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apple_watch" => Ok(Self::AppleWatch),
            "whoop" => Ok(Self::Whoop),
            "fitbit" => Ok(Self::Fitbit),
            "garmin" => Ok(Self::Garmin),
            other => Err(AppError::invalid_input(format!(
                "Unsupported device type: {other}"
            ))),
        }
    }
}

/// A user's link to a wearable device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WearableConnection {
    /// Primary key
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Device kind
    pub device_type: DeviceType,
    /// Vendor access token
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    /// Connection time
    pub connected_at: DateTime<Utc>,
    /// Last successful sync
    pub last_sync: Option<DateTime<Utc>>,
    /// `connected`, `disconnected` or `error`
    pub status: String,
}

/// Health data captured from a device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WearableSample {
    /// Primary key
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Source device
    pub device_type: DeviceType,
    /// Raw payload
    pub data: serde_json::Value,
    /// Capture time
    pub recorded_at: DateTime<Utc>,
}
