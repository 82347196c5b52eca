// ABOUTME: Google Maps web services client for geocoding and directions
// ABOUTME: Unwraps the status envelope and returns the first match or route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::circuit_breaker::CircuitBreaker;
use crate::errors::VendorError;
use crate::http_client::{normalize_base_url, read_json, shared_client};

const VENDOR: &str = "Google Maps";

/// Production Maps web services base URL
pub const MAPS_API_BASE: &str = "https://maps.googleapis.com/maps/api";

/// Geocoding result for an address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodeResult {
    /// Canonical address
    pub formatted_address: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Google place id
    pub place_id: Option<String>,
}

/// One step of a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsStep {
    /// HTML instruction text
    pub instruction: String,
    /// Human-readable distance
    pub distance: String,
    /// Human-readable duration
    pub duration: String,
}

/// First route between two places
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsSummary {
    /// Route summary (main roads)
    pub summary: String,
    /// Human-readable distance
    pub distance_text: String,
    /// Distance in metres
    pub distance_meters: i64,
    /// Human-readable duration
    pub duration_text: String,
    /// Duration in seconds
    pub duration_seconds: i64,
    /// Resolved origin address
    pub start_address: String,
    /// Resolved destination address
    pub end_address: String,
    /// Turn-by-turn steps
    pub steps: Vec<DirectionsStep>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
    #[serde(default = "Vec::new")]
    routes: Vec<T>,
    error_message: Option<String>,
}

impl<T> Envelope<T> {
    fn into_first(self, from_routes: bool) -> Result<T, VendorError> {
        if self.status != "OK" {
            return Err(VendorError::ApiStatus {
                vendor: VENDOR,
                message: self
                    .error_message
                    .unwrap_or_else(|| format!("Request failed: {}", self.status)),
                status: self.status,
            });
        }
        let items = if from_routes { self.routes } else { self.results };
        items
            .into_iter()
            .next()
            .ok_or_else(|| VendorError::invalid_response(VENDOR, "empty result set"))
    }
}

#[derive(Debug, Deserialize)]
struct RawGeocode {
    formatted_address: String,
    place_id: Option<String>,
    geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    location: RawLatLng,
}

#[derive(Debug, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    distance: RawValue,
    duration: RawValue,
    #[serde(default)]
    start_address: String,
    #[serde(default)]
    end_address: String,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    text: String,
    value: i64,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    html_instructions: String,
    distance: RawValue,
    duration: RawValue,
}

/// Google Maps client authenticated with the server API key
#[derive(Debug)]
pub struct MapsClient {
    api_key: String,
    base_url: String,
    breaker: CircuitBreaker,
}

impl MapsClient {
    /// Create a client against the production API
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: MAPS_API_BASE.to_owned(),
            breaker: CircuitBreaker::new(VENDOR),
        }
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Resolve an address to coordinates
    ///
    /// # Errors
    ///
    /// Returns `VendorError::ApiStatus` when Google reports no match
    #[instrument(skip(self), fields(vendor = VENDOR))]
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResult, VendorError> {
        let envelope: Envelope<RawGeocode> = self
            .breaker
            .call(async {
                let response = shared_client()
                    .get(format!("{}/geocode/json", self.base_url))
                    .query(&[("address", address), ("key", self.api_key.as_str())])
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;

        let raw = envelope.into_first(false)?;
        Ok(GeocodeResult {
            formatted_address: raw.formatted_address,
            latitude: raw.geometry.location.lat,
            longitude: raw.geometry.location.lng,
            place_id: raw.place_id,
        })
    }

    /// Compute the first route between two places
    ///
    /// # Errors
    ///
    /// Returns `VendorError::ApiStatus` when Google finds no route
    #[instrument(skip(self), fields(vendor = VENDOR))]
    pub async fn directions(
        &self,
        origin: &str,
        destination: &str,
        mode: &str,
    ) -> Result<DirectionsSummary, VendorError> {
        let envelope: Envelope<RawRoute> = self
            .breaker
            .call(async {
                let response = shared_client()
                    .get(format!("{}/directions/json", self.base_url))
                    .query(&[
                        ("origin", origin),
                        ("destination", destination),
                        ("mode", mode),
                        ("key", self.api_key.as_str()),
                    ])
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;

        let route = envelope.into_first(true)?;
        let leg = route
            .legs
            .into_iter()
            .next()
            .ok_or_else(|| VendorError::invalid_response(VENDOR, "route has no legs"))?;

        Ok(DirectionsSummary {
            summary: route.summary,
            distance_text: leg.distance.text,
            distance_meters: leg.distance.value,
            duration_text: leg.duration.text,
            duration_seconds: leg.duration.value,
            start_address: leg.start_address,
            end_address: leg.end_address,
            steps: leg
                .steps
                .into_iter()
                .map(|step| DirectionsStep {
                    instruction: step.html_instructions,
                    distance: step.distance.text,
                    duration: step.duration.text,
                })
                .collect(),
        })
    }
}
