// ABOUTME: Great-circle distance helpers for location ranking
// ABOUTME: Haversine distance in miles and kilometres plus decimal rounding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use serde::{Deserialize, Serialize};

use crate::constants::geo::{EARTH_RADIUS_KM, EARTH_RADIUS_MILES};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build coordinates when both components are present
    #[must_use]
    pub const fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// Central angle between two points on a sphere, in radians
fn central_angle(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Haversine distance in miles
#[must_use]
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    EARTH_RADIUS_MILES * central_angle(a, b)
}

/// Haversine distance in kilometres
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    EARTH_RADIUS_KM * central_angle(a, b)
}

/// Round `value` to `places` decimal places
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}
