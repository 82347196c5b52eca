// ABOUTME: HTTP integration tests for marketplace listing routes
// ABOUTME: Covers seeding, filtering, distance ranking, creation, and seller-only deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use goodrunss_server::resources::ServerResources;
use goodrunss_server::routes::MarketplaceRoutes;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

async fn seeded_resources() -> Arc<ServerResources> {
    common::create_test_resources(&[("MARKETPLACE_SEED_SAMPLE_DATA", "true")]).await
}

fn app(resources: &Arc<ServerResources>) -> axum::Router {
    MarketplaceRoutes::routes(Arc::clone(resources))
}

fn listing_body(seller_id: i64) -> Value {
    json!({
        "title": "Spalding Indoor Ball",
        "description": "Composite leather, used one season",
        "price": 20.0,
        "type": "sell",
        "condition": "Good",
        "category": "basketball",
        "zip_code": "10003",
        "seller_id": seller_id,
        "latitude": 40.7323,
        "longitude": -73.9874
    })
}

// ============================================================================
// GET /marketplace/listings
// ============================================================================

#[tokio::test]
async fn test_list_seeds_sample_catalogue() {
    let resources = seeded_resources().await;

    let response = AxumTestRequest::get("/marketplace/listings")
        .send(app(&resources))
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "database");
    assert_eq!(body["count"], 6);

    let distances: Vec<f64> = body["listings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["distance_value"].as_f64().unwrap())
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert!(body["listings"][0]["distance"]
        .as_str()
        .unwrap()
        .ends_with(" miles"));
}

#[tokio::test]
async fn test_list_without_seeding_is_empty() {
    let resources = common::create_test_resources(&[]).await;

    let body: Value = AxumTestRequest::get("/marketplace/listings")
        .send(app(&resources))
        .await
        .json();

    assert_eq!(body["count"], 0);
    assert_eq!(body["listings"], json!([]));
}

#[tokio::test]
async fn test_list_filters_by_type() {
    let resources = seeded_resources().await;

    let rent: Value = AxumTestRequest::get("/marketplace/listings?type=rent")
        .send(app(&resources))
        .await
        .json();
    let listings = rent["listings"].as_array().unwrap();
    assert_eq!(listings.len(), 3);
    assert!(listings.iter().all(|l| l["type"] == "rent"));

    let all: Value = AxumTestRequest::get("/marketplace/listings?type=all")
        .send(app(&resources))
        .await
        .json();
    assert_eq!(all["count"], 6);

    let unknown: Value = AxumTestRequest::get("/marketplace/listings?type=swap")
        .send(app(&resources))
        .await
        .json();
    assert_eq!(unknown["count"], 0);
}

#[tokio::test]
async fn test_list_filters_by_zip_prefix_and_search() {
    let resources = seeded_resources().await;

    let manhattan: Value = AxumTestRequest::get("/marketplace/listings?zip_code=10016")
        .send(app(&resources))
        .await
        .json();
    let zips: Vec<&str> = manhattan["listings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["zip_code"].as_str().unwrap())
        .collect();
    assert_eq!(zips.len(), 6);
    assert!(zips.iter().all(|z| z.starts_with("100")));

    let brooklyn: Value = AxumTestRequest::get("/marketplace/listings?zip_code=11201")
        .send(app(&resources))
        .await
        .json();
    assert_eq!(brooklyn["count"], 0);

    let search: Value = AxumTestRequest::get("/marketplace/listings?search=RACKET")
        .send(app(&resources))
        .await
        .json();
    assert_eq!(search["count"], 1);
    assert_eq!(search["listings"][0]["category"], "tennis");
}

#[tokio::test]
async fn test_list_ranks_from_caller_location() {
    let resources = seeded_resources().await;

    // Lower East Side: the volleyball net is listed on this corner
    let body: Value =
        AxumTestRequest::get("/marketplace/listings?user_lat=40.7209&user_lon=-73.9876")
            .send(app(&resources))
            .await
            .json();

    assert_eq!(body["listings"][0]["category"], "volleyball");
    assert_eq!(body["listings"][0]["distance"], "0.0 miles");
    assert_eq!(body["listings"][1]["category"], "pickleball");
}

#[tokio::test]
async fn test_sample_catalogue_carries_seller_ratings() {
    let resources = seeded_resources().await;

    let body: Value = AxumTestRequest::get("/marketplace/listings?search=paddle")
        .send(app(&resources))
        .await
        .json();

    let listing = &body["listings"][0];
    assert_eq!(listing["seller_name"], "David Lee");
    assert_eq!(listing["seller_rating"], 4.7);
    assert_eq!(listing["condition"], "Excellent");
}

// ============================================================================
// Categories and seeding
// ============================================================================

#[tokio::test]
async fn test_categories_are_distinct_and_sorted() {
    let resources = seeded_resources().await;
    AxumTestRequest::post("/marketplace/seed")
        .send(app(&resources))
        .await;

    let body: Value = AxumTestRequest::get("/marketplace/categories")
        .send(app(&resources))
        .await
        .json();

    assert_eq!(
        body["categories"],
        json!(["basketball", "golf", "pickleball", "tennis", "volleyball"])
    );
}

#[tokio::test]
async fn test_seed_only_fills_empty_table() {
    let resources = common::create_test_resources(&[]).await;

    let first: Value = AxumTestRequest::post("/marketplace/seed")
        .send(app(&resources))
        .await
        .json();
    assert_eq!(first["seeded"], 6);

    let second: Value = AxumTestRequest::post("/marketplace/seed")
        .send(app(&resources))
        .await
        .json();
    assert_eq!(second["seeded"], 0);
}

// ============================================================================
// POST /marketplace/listings
// ============================================================================

#[tokio::test]
async fn test_create_uses_profile_name() {
    let resources = common::create_test_resources(&[]).await;
    let seller_id = resources
        .database
        .create_user(&common::new_user("jordan"))
        .await
        .unwrap();

    let response = AxumTestRequest::post("/marketplace/listings")
        .json(&listing_body(seller_id))
        .send(app(&resources))
        .await;
    assert_eq!(response.status(), 201);
    let created: Value = response.json();
    let listing_id = created["listing_id"].as_i64().unwrap();

    let detail: Value = AxumTestRequest::get(&format!("/marketplace/listings/{listing_id}"))
        .send(app(&resources))
        .await
        .json();
    assert_eq!(detail["listing"]["seller_name"], "jordan");
    assert_eq!(detail["listing"]["seller_rating"], 5.0);
    assert_eq!(detail["listing"]["is_available"], true);
}

#[tokio::test]
async fn test_create_for_unknown_seller_falls_back_to_default_name() {
    let resources = common::create_test_resources(&[]).await;

    let created: Value = AxumTestRequest::post("/marketplace/listings")
        .json(&listing_body(4242))
        .send(app(&resources))
        .await
        .json();
    let listing_id = created["listing_id"].as_i64().unwrap();

    let detail: Value = AxumTestRequest::get(&format!("/marketplace/listings/{listing_id}"))
        .send(app(&resources))
        .await
        .json();
    assert_eq!(detail["listing"]["seller_name"], "User");
    assert_eq!(detail["listing"]["image"], "/placeholder.png");
}

#[tokio::test]
async fn test_create_rejects_blank_title_and_negative_price() {
    let resources = common::create_test_resources(&[]).await;

    let mut blank = listing_body(1);
    blank["title"] = json!("   ");
    let response = AxumTestRequest::post("/marketplace/listings")
        .json(&blank)
        .send(app(&resources))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");

    let mut negative = listing_body(1);
    negative["price"] = json!(-5.0);
    let response = AxumTestRequest::post("/marketplace/listings")
        .json(&negative)
        .send(app(&resources))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_get_unknown_listing_is_not_found() {
    let resources = common::create_test_resources(&[]).await;

    let response = AxumTestRequest::get("/marketplace/listings/999")
        .send(app(&resources))
        .await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

// ============================================================================
// DELETE /marketplace/listings/:id
// ============================================================================

#[tokio::test]
async fn test_delete_is_restricted_to_seller() {
    let resources = common::create_test_resources(&[]).await;
    let created: Value = AxumTestRequest::post("/marketplace/listings")
        .json(&listing_body(7))
        .send(app(&resources))
        .await
        .json();
    let listing_id = created["listing_id"].as_i64().unwrap();
    let uri = format!("/marketplace/listings/{listing_id}");

    let missing = AxumTestRequest::delete(&uri).send(app(&resources)).await;
    assert_eq!(missing.status(), 400);

    let stranger = AxumTestRequest::delete(&format!("{uri}?user_id=8"))
        .send(app(&resources))
        .await;
    assert_eq!(stranger.status(), 403);

    let unknown = AxumTestRequest::delete("/marketplace/listings/999?user_id=7")
        .send(app(&resources))
        .await;
    assert_eq!(unknown.status(), 404);

    let owner = AxumTestRequest::delete(&format!("{uri}?user_id=7"))
        .send(app(&resources))
        .await;
    assert_eq!(owner.status(), 200);

    let listed: Value = AxumTestRequest::get("/marketplace/listings")
        .send(app(&resources))
        .await
        .json();
    assert_eq!(listed["count"], 0);

    let detail: Value = AxumTestRequest::get(&uri).send(app(&resources)).await.json();
    assert_eq!(detail["listing"]["is_available"], false);
}

#[tokio::test]
async fn test_seller_listings_only_include_available() {
    let resources = common::create_test_resources(&[]).await;
    for _ in 0..2 {
        AxumTestRequest::post("/marketplace/listings")
            .json(&listing_body(3))
            .send(app(&resources))
            .await;
    }
    AxumTestRequest::delete("/marketplace/listings/1?user_id=3")
        .send(app(&resources))
        .await;

    let body: Value = AxumTestRequest::get("/marketplace/user/3/listings")
        .send(app(&resources))
        .await
        .json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["listings"][0]["id"], 2);
}
