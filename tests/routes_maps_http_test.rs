// ABOUTME: HTTP integration tests for the Google Maps routes
// ABOUTME: Geocoding against a mocked Maps API and local nearby-court ranking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use goodrunss_server::config::IntegrationsConfig;
use goodrunss_server::models::NewCourt;
use goodrunss_server::resources::{ServerResources, VendorClients};
use goodrunss_server::routes::MapsRoutes;
use goodrunss_vendors::maps::MapsClient;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn maps_resources(server: &MockServer) -> Arc<ServerResources> {
    let vendors = VendorClients {
        maps: Some(MapsClient::new("maps-key").with_base_url(&server.uri())),
        ..VendorClients::from_config(&IntegrationsConfig::default())
    };
    common::create_test_resources_with_vendors(&[], vendors).await
}

fn court(name: &str, latitude: f64, longitude: f64) -> NewCourt {
    NewCourt {
        name: name.to_owned(),
        address: format!("{name}, New York, NY"),
        latitude,
        longitude,
        price_per_hour: 40.0,
        owner_id: None,
    }
}

#[tokio::test]
async fn test_geocode_without_key_is_config_missing() {
    let resources = common::create_test_resources(&[]).await;

    let response = AxumTestRequest::post("/api/v1/maps/geocode")
        .json(&json!({ "address": "Central Park" }))
        .send(MapsRoutes::routes(resources))
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Google Maps not configured");
}

#[tokio::test]
async fn test_geocode_returns_first_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "Rucker Park"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "formatted_address": "W 155th St, New York, NY 10039, USA",
                "place_id": "rucker",
                "geometry": { "location": { "lat": 40.8296, "lng": -73.9362 } }
            }]
        })))
        .mount(&server)
        .await;

    let resources = maps_resources(&server).await;
    let body: Value = AxumTestRequest::post("/api/v1/maps/geocode")
        .json(&json!({ "address": "  Rucker Park " }))
        .send(MapsRoutes::routes(resources))
        .await
        .json();

    assert_eq!(body["success"], true);
    assert_eq!(body["place_id"], "rucker");
    assert_eq!(body["latitude"], 40.8296);
}

#[tokio::test]
async fn test_geocode_without_results_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let resources = maps_resources(&server).await;
    let response = AxumTestRequest::post("/api/v1/maps/geocode")
        .json(&json!({ "address": "Atlantis" }))
        .send(MapsRoutes::routes(resources))
        .await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_directions_rejects_unknown_mode() {
    let server = MockServer::start().await;
    let resources = maps_resources(&server).await;

    let response = AxumTestRequest::post("/api/v1/maps/directions")
        .json(&json!({ "origin": "A", "destination": "B", "mode": "teleport" }))
        .send(MapsRoutes::routes(resources))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_nearby_courts_within_radius() {
    let resources = common::create_test_resources(&[]).await;
    for new_court in [
        court("Bryant Park", 40.7536, -73.9832),
        court("Tompkins Square", 40.7265, -73.9815),
        court("Coney Island", 40.5749, -73.9859),
    ] {
        resources.database.create_court(&new_court).await.unwrap();
    }

    let body: Value = AxumTestRequest::post("/api/v1/maps/nearby-courts")
        .json(&json!({ "latitude": 40.7489, "longitude": -73.9680, "radius_km": 5.0, "limit": 1 }))
        .send(MapsRoutes::routes(resources))
        .await
        .json();

    assert_eq!(body["count"], 2);
    let courts = body["courts"].as_array().unwrap();
    assert_eq!(courts.len(), 1);
    assert_eq!(courts[0]["name"], "Bryant Park");
}

#[tokio::test]
async fn test_nearby_courts_rejects_non_positive_radius() {
    let resources = common::create_test_resources(&[]).await;

    let response = AxumTestRequest::post("/api/v1/maps/nearby-courts")
        .json(&json!({ "latitude": 40.0, "longitude": -73.0, "radius_km": 0.0 }))
        .send(MapsRoutes::routes(resources))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");
}
