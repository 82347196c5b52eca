// ABOUTME: HTTP integration tests for Instagram routes
// ABOUTME: Links an account and publishes an achievement against a mocked Graph API
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
use goodrunss_server::routes::InstagramRoutes;
use goodrunss_vendors::instagram::InstagramClient;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn instagram_resources(server: &MockServer) -> Arc<ServerResources> {
    let vendors = VendorClients {
        instagram: InstagramClient::new().with_base_url(&server.uri()),
        ..VendorClients::from_config(&IntegrationsConfig::default())
    };
    common::create_test_resources_with_vendors(&[], vendors).await
}

fn achievement_body() -> Value {
    json!({
        "achievement_name": "Perfect Game",
        "achievement_description": "Scored 100 in a pickup game",
        "achievement_image_url": "https://cdn.goodrunss.com/perfect.png"
    })
}

#[tokio::test]
async fn test_connect_unknown_user_is_not_found() {
    let server = MockServer::start().await;
    let resources = instagram_resources(&server).await;

    let response = AxumTestRequest::post("/api/v1/instagram/connect/41")
        .json(&json!({ "access_token": "ig-token" }))
        .send(InstagramRoutes::routes(resources))
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_connect_with_rejected_token_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Invalid OAuth access token." }
        })))
        .mount(&server)
        .await;

    let resources = instagram_resources(&server).await;
    let user_id = resources
        .database
        .create_user(&common::new_user("sharer"))
        .await
        .unwrap();

    let response = AxumTestRequest::post(&format!("/api/v1/instagram/connect/{user_id}"))
        .json(&json!({ "access_token": "expired" }))
        .send(InstagramRoutes::routes(resources))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "EXTERNAL_AUTH_FAILED");
}

#[tokio::test]
async fn test_post_without_connection_is_not_found() {
    let server = MockServer::start().await;
    let resources = instagram_resources(&server).await;

    let response = AxumTestRequest::post("/api/v1/instagram/post-achievement/2")
        .json(&achievement_body())
        .send(InstagramRoutes::routes(resources))
        .await;

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_connect_then_publish_achievement() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(query_param("access_token", "ig-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "17841400000000001",
            "username": "hooper_nyc"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/17841400000000001/media"))
        .and(body_string_contains("Perfect+Game"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "container-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/17841400000000001/media_publish"))
        .and(body_string_contains("creation_id=container-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "media-9" })))
        .expect(1)
        .mount(&server)
        .await;

    let resources = instagram_resources(&server).await;
    let user_id = resources
        .database
        .create_user(&common::new_user("hooper"))
        .await
        .unwrap();

    let connected = AxumTestRequest::post(&format!("/api/v1/instagram/connect/{user_id}"))
        .json(&json!({ "access_token": "ig-token" }))
        .send(InstagramRoutes::routes(Arc::clone(&resources)))
        .await;
    assert_eq!(connected.status(), 200);
    let body: Value = connected.json();
    assert_eq!(body["username"], "hooper_nyc");
    assert!(body["integration"].get("access_token").is_none());

    let posted = AxumTestRequest::post(&format!(
        "/api/v1/instagram/post-achievement/{user_id}"
    ))
    .json(&achievement_body())
    .send(InstagramRoutes::routes(resources))
    .await;
    assert_eq!(posted.status(), 200);
    let body: Value = posted.json();
    assert_eq!(body["media_id"], "media-9");
}
