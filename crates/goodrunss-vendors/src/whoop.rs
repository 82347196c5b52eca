// ABOUTME: WHOOP developer API client for recovery, strain, and sleep data
// ABOUTME: Verifies member tokens and fetches daily physiological records in a window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::circuit_breaker::CircuitBreaker;
use crate::errors::VendorError;
use crate::http_client::{normalize_base_url, read_json, shared_client};

const VENDOR: &str = "WHOOP";

/// Production WHOOP developer API base URL
pub const WHOOP_API_BASE: &str = "https://api.prod.whoop.com/developer/v1";

/// Page size used for collection endpoints
const PAGE_LIMIT: u32 = 25;

/// WHOOP member profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoopProfile {
    /// Member id
    pub user_id: i64,
    /// Member email
    pub email: Option<String>,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Paginated<T> {
    #[serde(default = "Vec::new")]
    records: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RawRecovery {
    created_at: Option<String>,
    score: Option<RawRecoveryScore>,
}

#[derive(Debug, Deserialize)]
struct RawRecoveryScore {
    recovery_score: Option<f64>,
    resting_heart_rate: Option<f64>,
    hrv_rmssd_milli: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCycle {
    start: String,
    score: Option<RawCycleScore>,
}

#[derive(Debug, Deserialize)]
struct RawCycleScore {
    strain: Option<f64>,
    kilojoule: Option<f64>,
    average_heart_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSleep {
    start: String,
    end: String,
    score: Option<RawSleepScore>,
}

#[derive(Debug, Deserialize)]
struct RawSleepScore {
    sleep_performance_percentage: Option<f64>,
    sleep_efficiency_percentage: Option<f64>,
}

/// Daily recovery record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecoveryRecord {
    /// When WHOOP scored the recovery
    pub recorded_at: Option<String>,
    /// Recovery percentage (0-100)
    pub recovery_score: Option<f64>,
    /// Resting heart rate in bpm
    pub resting_heart_rate: Option<f64>,
    /// Heart rate variability in milliseconds
    pub hrv_ms: Option<f64>,
}

/// Daily strain record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrainRecord {
    /// Cycle start
    pub start: String,
    /// Strain on the 0-21 scale
    pub strain: Option<f64>,
    /// Energy expenditure in kilojoules
    pub kilojoules: Option<f64>,
    /// Average heart rate in bpm
    pub average_heart_rate: Option<f64>,
}

/// Sleep record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SleepRecord {
    /// Sleep start
    pub start: String,
    /// Sleep end
    pub end: String,
    /// Sleep performance percentage
    pub performance: Option<f64>,
    /// Sleep efficiency percentage
    pub efficiency: Option<f64>,
}

/// Recovery, strain, and sleep for a time window
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WhoopSummary {
    /// Recovery records
    pub recovery: Vec<RecoveryRecord>,
    /// Strain records
    pub strain: Vec<StrainRecord>,
    /// Sleep records
    pub sleep: Vec<SleepRecord>,
}

/// WHOOP client authenticated per call with the member's token
#[derive(Debug)]
pub struct WhoopClient {
    base_url: String,
    breaker: CircuitBreaker,
}

impl Default for WhoopClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WhoopClient {
    /// Create a client against the production API
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: WHOOP_API_BASE.to_owned(),
            breaker: CircuitBreaker::new(VENDOR),
        }
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Resolve the member that owns `access_token`
    ///
    /// # Errors
    ///
    /// Returns `VendorError::AuthFailed` if the token is invalid
    #[instrument(skip_all, fields(vendor = VENDOR))]
    pub async fn profile(&self, access_token: &str) -> Result<WhoopProfile, VendorError> {
        self.get_json(access_token, "user/profile/basic", &[]).await
    }

    /// Fetch recovery, strain, and sleep between `start` and `end`
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if any of the three collections fails
    #[instrument(skip(self, access_token), fields(vendor = VENDOR))]
    pub async fn summary(
        &self,
        access_token: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<WhoopSummary, VendorError> {
        let window = [
            ("start", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("end", end.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("limit", PAGE_LIMIT.to_string()),
        ];

        let recovery: Paginated<RawRecovery> =
            self.get_json(access_token, "recovery", &window).await?;
        let cycles: Paginated<RawCycle> = self.get_json(access_token, "cycle", &window).await?;
        let sleep: Paginated<RawSleep> =
            self.get_json(access_token, "activity/sleep", &window).await?;

        debug!(
            recovery = recovery.records.len(),
            cycles = cycles.records.len(),
            sleep = sleep.records.len(),
            "Fetched WHOOP records"
        );

        Ok(WhoopSummary {
            recovery: recovery
                .records
                .into_iter()
                .map(|r| {
                    let score = r.score;
                    RecoveryRecord {
                        recorded_at: r.created_at,
                        recovery_score: score.as_ref().and_then(|s| s.recovery_score),
                        resting_heart_rate: score.as_ref().and_then(|s| s.resting_heart_rate),
                        hrv_ms: score.as_ref().and_then(|s| s.hrv_rmssd_milli),
                    }
                })
                .collect(),
            strain: cycles
                .records
                .into_iter()
                .map(|c| StrainRecord {
                    start: c.start,
                    strain: c.score.as_ref().and_then(|s| s.strain),
                    kilojoules: c.score.as_ref().and_then(|s| s.kilojoule),
                    average_heart_rate: c.score.as_ref().and_then(|s| s.average_heart_rate),
                })
                .collect(),
            sleep: sleep
                .records
                .into_iter()
                .map(|s| SleepRecord {
                    start: s.start,
                    end: s.end,
                    performance: s
                        .score
                        .as_ref()
                        .and_then(|sc| sc.sleep_performance_percentage),
                    efficiency: s
                        .score
                        .as_ref()
                        .and_then(|sc| sc.sleep_efficiency_percentage),
                })
                .collect(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        access_token: &str,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, VendorError> {
        self.breaker
            .call(async {
                let response = shared_client()
                    .get(format!("{}/{endpoint}", self.base_url))
                    .bearer_auth(access_token)
                    .query(query)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await
    }
}
