// ABOUTME: Vendor client tests against wiremock servers
// ABOUTME: Verifies request shape, response decoding, and error classification per vendor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use goodrunss_vendors::google::{GoogleOAuthClient, GoogleOAuthConfig};
use goodrunss_vendors::maps::MapsClient;
use goodrunss_vendors::stripe::{DestinationCharge, StripeClient};
use goodrunss_vendors::twilio::{TwilioClient, TwilioCredentials};
use goodrunss_vendors::whoop::WhoopClient;
use goodrunss_vendors::zoom::ZoomClient;
use goodrunss_vendors::VendorError;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Stripe
// ============================================================================

#[tokio::test]
async fn test_stripe_destination_charge_sends_split() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payment_intents"))
        .and(header("authorization", "Bearer sk_test_123"))
        .and(body_string_contains("amount=8000"))
        .and(body_string_contains("application_fee_amount=400"))
        .and(body_string_contains("confirm=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pi_123",
            "amount": 8000,
            "status": "succeeded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StripeClient::new("sk_test_123").with_base_url(&server.uri());
    let intent = client
        .create_destination_charge(&DestinationCharge {
            amount_cents: 8000,
            payment_method_id: "pm_card_visa",
            application_fee_cents: 400,
            destination_account: "acct_trainer",
            booking_id: 7,
        })
        .await
        .unwrap();

    assert_eq!(intent.id, "pi_123");
    assert_eq!(intent.status, "succeeded");
}

#[tokio::test]
async fn test_stripe_card_declined_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payment_intents"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": { "code": "card_declined", "message": "Your card was declined." }
        })))
        .mount(&server)
        .await;

    let client = StripeClient::new("sk_test_123").with_base_url(&server.uri());
    let err = client
        .create_destination_charge(&DestinationCharge {
            amount_cents: 1000,
            payment_method_id: "pm_card_chargeDeclined",
            application_fee_cents: 50,
            destination_account: "acct_trainer",
            booking_id: 1,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, VendorError::Rejected { status: 402, .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_stripe_payouts_use_connected_account_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/payouts"))
        .and(header("stripe-account", "acct_trainer"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                { "id": "po_2", "amount": 2500, "status": "paid", "arrival_date": 1_700_000_000, "created": 1_699_990_000, "method": "instant" },
                { "id": "po_1", "amount": 1200, "status": "pending", "arrival_date": null, "created": 1_699_000_000, "method": "standard" }
            ]
        })))
        .mount(&server)
        .await;

    let client = StripeClient::new("sk_test_123").with_base_url(&server.uri());
    let payouts = client.list_payouts("acct_trainer", 20).await.unwrap();

    assert_eq!(payouts.len(), 2);
    assert_eq!(payouts[0].id, "po_2");
    assert_eq!(payouts[0].method.as_deref(), Some("instant"));
    assert!(payouts[1].arrival_date.is_none());
}

// ============================================================================
// Twilio
// ============================================================================

fn twilio_credentials() -> TwilioCredentials {
    TwilioCredentials {
        account_sid: "AC123".to_owned(),
        auth_token: "token".to_owned(),
        from_number: "+15550000000".to_owned(),
    }
}

#[tokio::test]
async fn test_twilio_send_sms() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/Accounts/AC123/Messages.json"))
        .and(body_string_contains("From=%2B15550000000"))
        .and(body_string_contains("To=%2B15551234567"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sid": "SM123",
            "status": "queued"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TwilioClient::new(twilio_credentials()).with_base_url(&server.uri());
    let message = client.send_sms("+15551234567", "Game on").await.unwrap();

    assert_eq!(message.sid, "SM123");
    assert_eq!(message.status, "queued");
}

#[tokio::test]
async fn test_twilio_bad_credentials_are_auth_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authenticate"))
        .mount(&server)
        .await;

    let client = TwilioClient::new(twilio_credentials()).with_base_url(&server.uri());
    let err = client.send_sms("+15551234567", "hi").await.unwrap_err();

    assert!(matches!(err, VendorError::AuthFailed { vendor: "Twilio", .. }));
}

// ============================================================================
// Google Maps
// ============================================================================

#[tokio::test]
async fn test_maps_geocode_first_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "1 Park Ave"))
        .and(query_param("key", "maps-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "formatted_address": "1 Park Ave, New York, NY 10016, USA",
                "place_id": "place-1",
                "geometry": { "location": { "lat": 40.7466, "lng": -73.9813 } }
            }]
        })))
        .mount(&server)
        .await;

    let client = MapsClient::new("maps-key").with_base_url(&server.uri());
    let result = client.geocode("1 Park Ave").await.unwrap();

    assert_eq!(result.place_id.as_deref(), Some("place-1"));
    assert!((result.latitude - 40.7466).abs() < 1e-9);
    assert!((result.longitude + 73.9813).abs() < 1e-9);
}

#[tokio::test]
async fn test_maps_zero_results_is_api_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = MapsClient::new("maps-key").with_base_url(&server.uri());
    let err = client.geocode("nowhere").await.unwrap_err();

    match err {
        VendorError::ApiStatus { status, .. } => assert_eq!(status, "ZERO_RESULTS"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_maps_directions_first_leg() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/directions/json"))
        .and(query_param("mode", "walking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "routes": [{
                "summary": "Park Ave",
                "legs": [{
                    "distance": { "text": "0.5 mi", "value": 805 },
                    "duration": { "text": "10 mins", "value": 600 },
                    "start_address": "A",
                    "end_address": "B",
                    "steps": [{
                        "html_instructions": "Head <b>north</b>",
                        "distance": { "text": "0.5 mi", "value": 805 },
                        "duration": { "text": "10 mins", "value": 600 }
                    }]
                }]
            }]
        })))
        .mount(&server)
        .await;

    let client = MapsClient::new("maps-key").with_base_url(&server.uri());
    let route = client.directions("A", "B", "walking").await.unwrap();

    assert_eq!(route.summary, "Park Ave");
    assert_eq!(route.distance_meters, 805);
    assert_eq!(route.duration_seconds, 600);
    assert_eq!(route.steps.len(), 1);
}

// ============================================================================
// Google OAuth
// ============================================================================

#[tokio::test]
async fn test_google_exchange_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.token",
            "refresh_token": "1//refresh",
            "expires_in": 3599,
            "scope": "https://www.googleapis.com/auth/gmail.send"
        })))
        .mount(&server)
        .await;

    let client = GoogleOAuthClient::new(GoogleOAuthConfig {
        client_id: "client".to_owned(),
        client_secret: "secret".to_owned(),
    })
    .with_token_url(&format!("{}/token", server.uri()));

    let tokens = client
        .exchange_code("auth-code", "http://localhost:8001/api/v1/gmail/callback")
        .await
        .unwrap();

    assert_eq!(tokens.access_token, "ya29.token");
    assert_eq!(tokens.refresh_token.as_deref(), Some("1//refresh"));
}

// ============================================================================
// Zoom and WHOOP
// ============================================================================

#[tokio::test]
async fn test_zoom_current_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer zoom-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "zoom-user-1",
            "email": "coach@example.com"
        })))
        .mount(&server)
        .await;

    let client = ZoomClient::new().with_base_url(&server.uri());
    let user = client.current_user("zoom-token").await.unwrap();

    assert_eq!(user.id, "zoom-user-1");
    assert!(user.first_name.is_none());
}

#[tokio::test]
async fn test_whoop_server_errors_are_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/profile/basic"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = WhoopClient::new().with_base_url(&server.uri());
    let err = client.profile("whoop-token").await.unwrap_err();

    assert!(matches!(err, VendorError::ServerError { status: 503, .. }));
    assert!(err.is_retryable());
}
