// ABOUTME: Wearable device routes for connecting devices and reading health data
// ABOUTME: WHOOP data is fetched live while other devices serve stored samples
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! Wearable routes
//!
//! WHOOP is the only device with a server-side API. Apple Watch data arrives
//! from the mobile app as `HealthKit` uploads, and Fitbit and Garmin
//! connections are stored but not synced yet.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use goodrunss_core::constants::scheduling::DEFAULT_WEARABLE_DAYS;
use goodrunss_core::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::models::{DeviceType, WearableConnection};
use crate::resources::ServerResources;

/// Body of `POST /connect/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConnectDeviceRequest {
    /// Device identifier such as `whoop`
    pub device_type: String,
    /// Access token issued by the device vendor
    pub auth_token: String,
}

/// Query parameters for `GET /data/{user_id}`
#[derive(Debug, Deserialize)]
pub struct WearableDataQuery {
    /// Limit to one device
    pub device_type: Option<String>,
    /// Days of history
    pub days: Option<i64>,
}

/// Apple Watch upload from the mobile app
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HealthKitPayload {
    /// Heart rate samples
    #[serde(default)]
    pub heart_rate: Vec<Value>,
    /// Step count
    pub steps: Option<i64>,
    /// Active energy in kilocalories
    pub active_calories: Option<f64>,
    /// Estimated VO2 max
    pub vo2_max: Option<f64>,
    /// Hours asleep
    pub sleep_hours: Option<f64>,
    /// Workout summaries
    #[serde(default)]
    pub workouts: Vec<Value>,
    /// When the sample was taken on the device
    pub recorded_at: Option<DateTime<Utc>>,
}

impl HealthKitPayload {
    /// Number of individual values contained in the upload
    #[must_use]
    pub fn data_points(&self) -> usize {
        let scalars = [
            self.steps.is_some(),
            self.active_calories.is_some(),
            self.vo2_max.is_some(),
            self.sleep_hours.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count();

        self.heart_rate.len() + self.workouts.len() + scalars
    }
}

fn parse_device(raw: &str) -> AppResult<DeviceType> {
    raw.trim().to_lowercase().parse()
}

fn history_window(days: Option<i64>) -> AppResult<i64> {
    let days = days.unwrap_or(DEFAULT_WEARABLE_DAYS);
    if days < 1 {
        return Err(AppError::new(
            ErrorCode::ValueOutOfRange,
            "days must be at least 1",
        ));
    }
    Ok(days)
}

/// Wearable device routes
pub struct WearableRoutes;

impl WearableRoutes {
    /// Create all wearable routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/wearables/connect/:user_id", post(Self::handle_connect))
            .route("/api/v1/wearables/data/:user_id", get(Self::handle_data))
            .route("/api/v1/wearables/sync/:user_id", post(Self::handle_sync))
            .route(
                "/api/v1/wearables/healthkit/:user_id",
                post(Self::handle_healthkit),
            )
            .with_state(resources)
    }

    async fn require_user(resources: &ServerResources, user_id: i64) -> AppResult<()> {
        if resources.database.get_user(user_id).await?.is_none() {
            return Err(AppError::not_found("User").with_resource_id(user_id.to_string()));
        }
        Ok(())
    }

    /// Handle POST /api/v1/wearables/connect/:user_id
    async fn handle_connect(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<ConnectDeviceRequest>,
    ) -> Result<Response, AppError> {
        Self::require_user(&resources, user_id).await?;

        let device_type = parse_device(&request.device_type)?;
        let token = request.auth_token.trim();
        if token.is_empty() {
            return Err(AppError::missing_field("auth_token"));
        }

        if device_type == DeviceType::Whoop {
            let profile = resources.vendors.whoop.profile(token).await?;
            info!(user_id, whoop_user_id = profile.user_id, "WHOOP token verified");
        }

        let connection = resources
            .database
            .upsert_wearable_connection(user_id, device_type, token)
            .await?;

        info!(user_id, device = %device_type, "Wearable connected");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": format!("{device_type} connected successfully"),
                "connection": connection,
            })),
        )
            .into_response())
    }

    async fn device_data(
        resources: &ServerResources,
        connection: &WearableConnection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Value> {
        match (connection.device_type, connection.auth_token.as_deref()) {
            (DeviceType::Whoop, Some(token)) => {
                let summary = resources.vendors.whoop.summary(token, start, end).await?;
                Ok(json!({
                    "source": "live",
                    "last_sync": connection.last_sync,
                    "data": summary,
                }))
            }
            (device, _) => {
                let samples = resources
                    .database
                    .list_wearable_data(connection.user_id, device, start)
                    .await?;
                Ok(json!({
                    "source": "stored",
                    "last_sync": connection.last_sync,
                    "count": samples.len(),
                    "data": samples,
                }))
            }
        }
    }

    /// Handle GET /api/v1/wearables/data/:user_id
    async fn handle_data(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Query(query): Query<WearableDataQuery>,
    ) -> Result<Response, AppError> {
        let device_filter = query.device_type.as_deref().map(parse_device).transpose()?;
        let days = history_window(query.days)?;

        let connections = resources
            .database
            .list_wearable_connections(user_id, device_filter)
            .await?;
        if connections.is_empty() {
            return Err(AppError::not_found("Connected wearable device"));
        }

        let end = Utc::now();
        let start = end - Duration::days(days);

        let mut devices = BTreeMap::new();
        for connection in &connections {
            let data = Self::device_data(&resources, connection, start, end).await?;
            devices.insert(connection.device_type.as_str(), data);
        }

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "user_id": user_id,
                "days": days,
                "devices": devices,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/wearables/sync/:user_id
    async fn handle_sync(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let connections = resources
            .database
            .list_wearable_connections(user_id, None)
            .await?;
        if connections.is_empty() {
            return Err(AppError::not_found("Connected wearable device"));
        }

        let end = Utc::now();
        let start = end - Duration::days(1);

        let mut results = BTreeMap::new();
        for connection in &connections {
            let outcome = match (connection.device_type, connection.auth_token.as_deref()) {
                (DeviceType::Whoop, Some(token)) => {
                    match resources.vendors.whoop.summary(token, start, end).await {
                        Ok(summary) => {
                            let data = serde_json::to_value(&summary)?;
                            resources
                                .database
                                .store_wearable_data(user_id, DeviceType::Whoop, &data, end)
                                .await?;
                            resources
                                .database
                                .mark_wearable_synced(connection.id, end)
                                .await?;
                            json!({ "status": "synced", "synced_at": end })
                        }
                        Err(e) => {
                            warn!(user_id, error = %e, "WHOOP sync failed");
                            json!({ "status": "error", "error": e.to_string() })
                        }
                    }
                }
                _ => json!({ "status": "not_implemented" }),
            };
            results.insert(connection.device_type.as_str(), outcome);
        }

        info!(user_id, devices = results.len(), "Wearable sync finished");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "user_id": user_id,
                "results": results,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/wearables/healthkit/:user_id
    async fn handle_healthkit(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(payload): Json<HealthKitPayload>,
    ) -> Result<Response, AppError> {
        Self::require_user(&resources, user_id).await?;

        let data_points = payload.data_points();
        let recorded_at = payload.recorded_at.unwrap_or_else(Utc::now);
        let data = serde_json::to_value(&payload)?;

        let sample_id = resources
            .database
            .store_wearable_data(user_id, DeviceType::AppleWatch, &data, recorded_at)
            .await?;

        info!(user_id, sample_id, data_points, "HealthKit data stored");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "HealthKit data received",
                "data_points": data_points,
                "sample_id": sample_id,
            })),
        )
            .into_response())
    }
}
