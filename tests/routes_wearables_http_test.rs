// ABOUTME: HTTP integration tests for wearable device routes
// ABOUTME: Covers device connection, HealthKit uploads, and stored or live WHOOP data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use goodrunss_server::config::IntegrationsConfig;
use goodrunss_server::resources::{ServerResources, VendorClients};
use goodrunss_server::routes::WearableRoutes;
use goodrunss_vendors::whoop::WhoopClient;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn whoop_resources(server: &MockServer) -> Arc<ServerResources> {
    let vendors = VendorClients {
        whoop: WhoopClient::new().with_base_url(&server.uri()),
        ..VendorClients::from_config(&IntegrationsConfig::default())
    };
    common::create_test_resources_with_vendors(&[], vendors).await
}

async fn create_user(resources: &ServerResources, handle: &str) -> i64 {
    resources
        .database
        .create_user(&common::new_user(handle))
        .await
        .unwrap()
}

fn app(resources: &Arc<ServerResources>) -> axum::Router {
    WearableRoutes::routes(Arc::clone(resources))
}

#[tokio::test]
async fn test_connect_unknown_user_is_not_found() {
    let resources = common::create_test_resources(&[]).await;

    let response = AxumTestRequest::post("/api/v1/wearables/connect/99")
        .json(&json!({ "device_type": "fitbit", "auth_token": "tok" }))
        .send(app(&resources))
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_connect_rejects_unsupported_device_and_blank_token() {
    let resources = common::create_test_resources(&[]).await;
    let user_id = create_user(&resources, "runner").await;
    let uri = format!("/api/v1/wearables/connect/{user_id}");

    let unsupported = AxumTestRequest::post(&uri)
        .json(&json!({ "device_type": "oura", "auth_token": "tok" }))
        .send(app(&resources))
        .await;
    assert_eq!(unsupported.status(), 400);
    let body: Value = unsupported.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    let blank = AxumTestRequest::post(&uri)
        .json(&json!({ "device_type": "garmin", "auth_token": "  " }))
        .send(app(&resources))
        .await;
    assert_eq!(blank.status(), 400);
    let body: Value = blank.json();
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
}

#[tokio::test]
async fn test_healthkit_upload_is_readable_as_apple_watch_data() {
    let resources = common::create_test_resources(&[]).await;
    let user_id = create_user(&resources, "hooper").await;

    let connected = AxumTestRequest::post(&format!("/api/v1/wearables/connect/{user_id}"))
        .json(&json!({ "device_type": "Apple_Watch", "auth_token": "healthkit" }))
        .send(app(&resources))
        .await;
    assert_eq!(connected.status(), 200);

    let uploaded: Value = AxumTestRequest::post(&format!("/api/v1/wearables/healthkit/{user_id}"))
        .json(&json!({
            "heart_rate": [61, 88, 152],
            "steps": 10412,
            "workouts": [{ "type": "basketball", "minutes": 50 }]
        }))
        .send(app(&resources))
        .await
        .json();
    assert_eq!(uploaded["success"], true);
    assert_eq!(uploaded["data_points"], 5);

    let data: Value = AxumTestRequest::get(&format!(
        "/api/v1/wearables/data/{user_id}?device_type=apple_watch&days=3"
    ))
    .send(app(&resources))
    .await
    .json();
    assert_eq!(data["days"], 3);
    let device = &data["devices"]["apple_watch"];
    assert_eq!(device["source"], "stored");
    assert_eq!(device["count"], 1);
}

#[tokio::test]
async fn test_data_without_connections_is_not_found() {
    let resources = common::create_test_resources(&[]).await;
    let user_id = create_user(&resources, "walker").await;

    let response = AxumTestRequest::get(&format!("/api/v1/wearables/data/{user_id}"))
        .send(app(&resources))
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_data_rejects_empty_window() {
    let resources = common::create_test_resources(&[]).await;

    let response = AxumTestRequest::get("/api/v1/wearables/data/1?days=0")
        .send(app(&resources))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_whoop_connect_verifies_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/profile/basic"))
        .and(header("authorization", "Bearer good-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": 10129,
            "email": "athlete@example.com"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/profile/basic"))
        .and(header("authorization", "Bearer stale-token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let resources = whoop_resources(&server).await;
    let user_id = create_user(&resources, "strapped").await;
    let uri = format!("/api/v1/wearables/connect/{user_id}");

    let stale = AxumTestRequest::post(&uri)
        .json(&json!({ "device_type": "whoop", "auth_token": "stale-token" }))
        .send(app(&resources))
        .await;
    assert_eq!(stale.status(), 400);
    let body: Value = stale.json();
    assert_eq!(body["error"]["code"], "EXTERNAL_AUTH_FAILED");

    let good = AxumTestRequest::post(&uri)
        .json(&json!({ "device_type": "whoop", "auth_token": "good-token" }))
        .send(app(&resources))
        .await;
    assert_eq!(good.status(), 200);
    let body: Value = good.json();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_sync_reports_per_device_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/profile/basic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user_id": 7 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recovery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{
                "created_at": "2025-08-02T07:00:00.000Z",
                "score": { "recovery_score": 71.0, "resting_heart_rate": 52.0, "hrv_rmssd_milli": 64.5 }
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cycle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/activity/sleep"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let resources = whoop_resources(&server).await;
    let user_id = create_user(&resources, "synced").await;
    for device in ["whoop", "garmin"] {
        let response = AxumTestRequest::post(&format!("/api/v1/wearables/connect/{user_id}"))
            .json(&json!({ "device_type": device, "auth_token": "token" }))
            .send(app(&resources))
            .await;
        assert_eq!(response.status(), 200);
    }

    let body: Value = AxumTestRequest::post(&format!("/api/v1/wearables/sync/{user_id}"))
        .send(app(&resources))
        .await
        .json();

    assert_eq!(body["results"]["whoop"]["status"], "synced");
    assert_eq!(body["results"]["garmin"]["status"], "not_implemented");
}

#[tokio::test]
async fn test_sync_without_connections_is_not_found() {
    let resources = common::create_test_resources(&[]).await;

    let response = AxumTestRequest::post("/api/v1/wearables/sync/5")
        .send(app(&resources))
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_whoop_data_is_read_live() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/profile/basic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user_id": 7 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recovery"))
        .and(header("authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{
                "created_at": "2025-08-02T07:00:00.000Z",
                "score": { "recovery_score": 83.0, "resting_heart_rate": 49.0, "hrv_rmssd_milli": 71.2 }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cycle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{
                "start": "2025-08-01T06:30:00.000Z",
                "score": { "strain": 14.2, "kilojoule": 9100.0, "average_heart_rate": 78.0 }
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/activity/sleep"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [] })))
        .mount(&server)
        .await;

    let resources = whoop_resources(&server).await;
    let user_id = create_user(&resources, "recovered").await;
    let connected = AxumTestRequest::post(&format!("/api/v1/wearables/connect/{user_id}"))
        .json(&json!({ "device_type": "whoop", "auth_token": "live-token" }))
        .send(app(&resources))
        .await;
    assert_eq!(connected.status(), 200);

    let data: Value = AxumTestRequest::get(&format!(
        "/api/v1/wearables/data/{user_id}?device_type=whoop"
    ))
    .send(app(&resources))
    .await
    .json();

    let whoop = &data["devices"]["whoop"];
    assert_eq!(whoop["source"], "live");
    assert_eq!(whoop["data"]["recovery"][0]["recovery_score"], 83.0);
    assert_eq!(whoop["data"]["strain"][0]["strain"], 14.2);
    assert_eq!(whoop["data"]["sleep"].as_array().unwrap().len(), 0);
}
