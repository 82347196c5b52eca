// ABOUTME: Tests for loading server configuration from process environment variables
// ABOUTME: Serialized because each test mutates the shared process environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use goodrunss_server::config::ServerConfig;
use serial_test::serial;

const KEYS: &[&str] = &[
    "HTTP_PORT",
    "DATABASE_URL",
    "CORS_ALLOWED_ORIGINS",
    "STRIPE_SECRET_KEY",
    "TWILIO_ACCOUNT_SID",
    "TWILIO_AUTH_TOKEN",
    "TWILIO_PHONE_NUMBER",
    "MARKETPLACE_SEED_SAMPLE_DATA",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_from_env_reads_process_variables() {
    clear_env();
    env::set_var("HTTP_PORT", "8123");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://goodrunss.com");
    env::set_var("MARKETPLACE_SEED_SAMPLE_DATA", "false");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.http_port, 8123);
    assert_eq!(config.database.url, "sqlite::memory:");
    assert_eq!(config.cors.allowed_origins, "https://goodrunss.com");
    assert!(!config.marketplace.seed_sample_data);
    assert_eq!(config.public_base_url, "http://localhost:8123");
}

#[test]
#[serial]
fn test_from_env_enables_vendors_with_complete_credentials() {
    clear_env();
    env::set_var("STRIPE_SECRET_KEY", "sk_test_abc");
    env::set_var("TWILIO_ACCOUNT_SID", "AC123");
    env::set_var("TWILIO_AUTH_TOKEN", "secret");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.integrations.stripe_secret_key(), Some("sk_test_abc"));
    assert!(config.integrations.twilio().is_none());
    assert!(config.integrations.is_vendor_enabled("stripe"));
    assert!(!config.integrations.is_vendor_enabled("twilio_sms"));

    let summary = config.summary();
    assert!(!summary.contains("sk_test_abc"));
    assert!(!summary.contains("secret"));
}

#[test]
#[serial]
fn test_from_env_rejects_malformed_port() {
    clear_env();
    env::set_var("HTTP_PORT", "not-a-port");

    let result = ServerConfig::from_env();
    clear_env();

    assert!(result.is_err());
}
