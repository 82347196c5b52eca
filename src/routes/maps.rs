// ABOUTME: Google Maps routes for geocoding, directions, and nearby court search
// ABOUTME: Nearby courts are ranked locally by great-circle distance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use goodrunss_core::constants::geo::{DEFAULT_COURT_LIMIT, DEFAULT_COURT_RADIUS_KM};
use goodrunss_core::errors::{AppError, AppResult, ErrorCode};
use goodrunss_core::geo::{haversine_km, round_to, Coordinates};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::Court;
use crate::resources::ServerResources;

const DEFAULT_TRAVEL_MODE: &str = "driving";
const TRAVEL_MODES: [&str; 4] = ["driving", "walking", "bicycling", "transit"];

/// Body of `POST /geocode`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GeocodeRequest {
    /// Free-form address
    pub address: String,
}

/// Body of `POST /directions`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DirectionsRequest {
    /// Starting address or `lat,lng`
    pub origin: String,
    /// Destination address or `lat,lng`
    pub destination: String,
    /// `driving`, `walking`, `bicycling` or `transit`
    pub mode: Option<String>,
}

/// Body of `POST /nearby-courts`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NearbyCourtsRequest {
    /// Search centre latitude
    pub latitude: f64,
    /// Search centre longitude
    pub longitude: f64,
    /// Search radius in kilometres
    pub radius_km: Option<f64>,
    /// Maximum number of courts returned
    pub limit: Option<usize>,
}

/// Court with its distance from the search centre
#[derive(Debug, Serialize)]
pub struct NearbyCourt {
    /// Court record
    #[serde(flatten)]
    pub court: Court,
    /// Distance in kilometres, two decimals
    pub distance_km: f64,
}

/// Courts within `radius_km` of `origin`, nearest first
///
/// Returns the truncated list together with the number of courts inside the
/// radius before truncation.
#[must_use]
pub fn courts_within(
    courts: Vec<Court>,
    origin: Coordinates,
    radius_km: f64,
    limit: usize,
) -> (Vec<NearbyCourt>, usize) {
    let mut nearby: Vec<NearbyCourt> = courts
        .into_iter()
        .filter_map(|court| {
            let distance = haversine_km(origin, Coordinates::new(court.latitude, court.longitude));
            (distance <= radius_km).then(|| NearbyCourt {
                court,
                distance_km: round_to(distance, 2),
            })
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    let total = nearby.len();
    nearby.truncate(limit);
    (nearby, total)
}

fn require_text<'a>(value: &'a str, field: &str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::missing_field(field));
    }
    Ok(trimmed)
}

/// Google Maps routes
pub struct MapsRoutes;

impl MapsRoutes {
    /// Create all maps routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/maps/geocode", post(Self::handle_geocode))
            .route("/api/v1/maps/directions", post(Self::handle_directions))
            .route("/api/v1/maps/nearby-courts", post(Self::handle_nearby_courts))
            .with_state(resources)
    }

    /// Handle POST /api/v1/maps/geocode
    async fn handle_geocode(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<GeocodeRequest>,
    ) -> Result<Response, AppError> {
        let maps = resources.maps()?;
        let address = require_text(&request.address, "address")?;
        let result = maps.geocode(address).await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "formatted_address": result.formatted_address,
                "latitude": result.latitude,
                "longitude": result.longitude,
                "place_id": result.place_id,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/maps/directions
    async fn handle_directions(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<DirectionsRequest>,
    ) -> Result<Response, AppError> {
        let maps = resources.maps()?;
        let origin = require_text(&request.origin, "origin")?;
        let destination = require_text(&request.destination, "destination")?;

        let mode = request
            .mode
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_TRAVEL_MODE);
        if !TRAVEL_MODES.contains(&mode) {
            return Err(AppError::invalid_input(format!(
                "Unsupported travel mode: {mode}"
            )));
        }

        let route = maps.directions(origin, destination, mode).await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "mode": mode,
                "route": route,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/maps/nearby-courts
    async fn handle_nearby_courts(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<NearbyCourtsRequest>,
    ) -> Result<Response, AppError> {
        let radius_km = request.radius_km.unwrap_or(DEFAULT_COURT_RADIUS_KM);
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "radius_km must be greater than zero",
            ));
        }
        if !(-90.0..=90.0).contains(&request.latitude)
            || !(-180.0..=180.0).contains(&request.longitude)
        {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "latitude or longitude out of range",
            ));
        }

        let courts = resources.database.list_available_courts().await?;
        let (nearby, total) = courts_within(
            courts,
            Coordinates::new(request.latitude, request.longitude),
            radius_km,
            request.limit.unwrap_or(DEFAULT_COURT_LIMIT),
        );

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": total,
                "radius_km": radius_km,
                "courts": nearby,
            })),
        )
            .into_response())
    }
}
