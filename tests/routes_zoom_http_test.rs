// ABOUTME: HTTP integration tests for Zoom virtual training routes
// ABOUTME: Connects an account and schedules sessions against a mocked Zoom API
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
use goodrunss_server::routes::ZoomRoutes;
use goodrunss_vendors::zoom::ZoomClient;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn zoom_resources(server: &MockServer) -> Arc<ServerResources> {
    let vendors = VendorClients {
        zoom: ZoomClient::new().with_base_url(&server.uri()),
        ..VendorClients::from_config(&IntegrationsConfig::default())
    };
    common::create_test_resources_with_vendors(&[], vendors).await
}

async fn mount_current_user(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer zoom-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "zu_coach",
            "email": "coach@example.com"
        })))
        .mount(server)
        .await;
}

fn session_body() -> Value {
    json!({
        "trainer_name": "Coach Kim",
        "session_type": "shooting",
        "start_time": "2025-08-03T15:00:00Z",
        "duration_minutes": 45,
        "price": 40.0
    })
}

#[tokio::test]
async fn test_connect_unknown_user_is_not_found() {
    let server = MockServer::start().await;
    let resources = zoom_resources(&server).await;

    let response = AxumTestRequest::post("/api/v1/zoom/connect/77")
        .json(&json!({ "access_token": "zoom-token" }))
        .send(ZoomRoutes::routes(resources))
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_create_session_requires_connected_account() {
    let server = MockServer::start().await;
    let resources = zoom_resources(&server).await;

    let response = AxumTestRequest::post("/api/v1/zoom/create-virtual-session/3")
        .json(&session_body())
        .send(ZoomRoutes::routes(resources))
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_connect_then_schedule_session() {
    let server = MockServer::start().await;
    mount_current_user(&server).await;
    Mock::given(method("POST"))
        .and(path("/users/zu_coach/meetings"))
        .and(body_partial_json(json!({
            "topic": "Shooting Session with Coach Kim",
            "duration": 45
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 8_812_345_678_i64,
            "join_url": "https://zoom.us/j/8812345678",
            "start_url": "https://zoom.us/s/8812345678"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resources = zoom_resources(&server).await;
    let user_id = resources
        .database
        .create_user(&common::new_user("coachkim"))
        .await
        .unwrap();

    let connected = AxumTestRequest::post(&format!("/api/v1/zoom/connect/{user_id}"))
        .json(&json!({ "access_token": "zoom-token" }))
        .send(ZoomRoutes::routes(Arc::clone(&resources)))
        .await;
    assert_eq!(connected.status(), 200);

    let created = AxumTestRequest::post(&format!(
        "/api/v1/zoom/create-virtual-session/{user_id}"
    ))
    .json(&session_body())
    .send(ZoomRoutes::routes(Arc::clone(&resources)))
    .await;
    assert_eq!(created.status(), 201);
    let body: Value = created.json();
    assert_eq!(body["meeting_id"], 8_812_345_678_i64);
    assert_eq!(body["join_url"], "https://zoom.us/j/8812345678");

    let listed: Value = AxumTestRequest::get(&format!("/api/v1/zoom/virtual-sessions/{user_id}"))
        .send(ZoomRoutes::routes(resources))
        .await
        .json();
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["sessions"][0]["trainer_name"], "Coach Kim");
}

#[tokio::test]
async fn test_zero_duration_session_is_rejected() {
    let server = MockServer::start().await;
    let resources = zoom_resources(&server).await;

    let mut body = session_body();
    body["duration_minutes"] = json!(0);
    let response = AxumTestRequest::post("/api/v1/zoom/create-virtual-session/1")
        .json(&body)
        .send(ZoomRoutes::routes(resources))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");
}
