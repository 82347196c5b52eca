// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, server resources, and seeded users, courts and bookings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs
)]
//! Shared test utilities for `goodrunss_server`

use std::collections::HashMap;
use std::sync::{Arc, Once};

use chrono::{Duration, Utc};
use goodrunss_server::{
    config::ServerConfig,
    database::Database,
    models::{NewBooking, NewCourt, NewUser},
    resources::{ServerResources, VendorClients},
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Configuration built from explicit pairs on top of test defaults
///
/// Sample listing seeding is off unless a test turns it on.
pub fn test_config(pairs: &[(&str, &str)]) -> ServerConfig {
    let mut values: HashMap<String, String> = HashMap::from([
        ("DATABASE_URL".to_owned(), "sqlite::memory:".to_owned()),
        ("MARKETPLACE_SEED_SAMPLE_DATA".to_owned(), "false".to_owned()),
    ]);
    for (key, value) in pairs {
        values.insert((*key).to_owned(), (*value).to_owned());
    }
    ServerConfig::from_lookup(|key| values.get(key).cloned()).expect("valid test config")
}

/// Fresh migrated in-memory database
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

/// Resources with the given configuration over a fresh database
pub async fn create_test_resources(pairs: &[(&str, &str)]) -> Arc<ServerResources> {
    let database = create_test_database().await;
    Arc::new(ServerResources::new(database, test_config(pairs)))
}

/// Resources whose vendor clients are supplied by the test
pub async fn create_test_resources_with_vendors(
    pairs: &[(&str, &str)],
    vendors: VendorClients,
) -> Arc<ServerResources> {
    let database = create_test_database().await;
    Arc::new(ServerResources::new(database, test_config(pairs)).with_vendors(vendors))
}

/// Player account named after `handle`
pub fn new_user(handle: &str) -> NewUser {
    NewUser {
        email: format!("{handle}@example.com"),
        username: handle.to_owned(),
        name: handle.to_owned(),
        hashed_password: "hash".to_owned(),
        ..NewUser::default()
    }
}

/// Seeded player, trainer and court
pub struct BookingFixture {
    pub player_id: i64,
    pub trainer_id: i64,
    pub court_id: i64,
    pub booking_id: i64,
}

/// Create a player, a Stripe-connected trainer, a court and a booking tomorrow
pub async fn seed_booking(database: &Database) -> BookingFixture {
    let player_id = database.create_user(&new_user("player")).await.unwrap();
    let trainer_id = database
        .create_user(&NewUser {
            is_trainer: true,
            stripe_connect_id: Some("acct_trainer".to_owned()),
            ..new_user("trainer")
        })
        .await
        .unwrap();
    let court_id = database
        .create_court(&NewCourt {
            name: "Central Court".to_owned(),
            address: "1 Park Ave".to_owned(),
            latitude: 40.7500,
            longitude: -73.9700,
            price_per_hour: 40.0,
            owner_id: None,
        })
        .await
        .unwrap();
    let start = Utc::now() + Duration::days(1);
    let booking_id = database
        .create_booking(&NewBooking {
            user_id: player_id,
            trainer_id,
            court_id,
            start_time: start,
            end_time: start + Duration::hours(1),
            total_price: 80.0,
        })
        .await
        .unwrap();

    BookingFixture {
        player_id,
        trainer_id,
        court_id,
        booking_id,
    }
}
