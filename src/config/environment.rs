// ABOUTME: Server configuration loaded from environment variables and an optional .env file
// ABOUTME: Covers HTTP binding, database, CORS, marketplace defaults, and vendor credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::env;
use std::net::IpAddr;
use std::str::FromStr;

use goodrunss_core::constants::geo::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE};
use goodrunss_core::constants::service::DEFAULT_HTTP_PORT;
use goodrunss_core::errors::{AppError, AppResult};
use goodrunss_core::geo::Coordinates;
use tracing::{info, warn};

use super::integrations::IntegrationsConfig;
use super::types::{Environment, LogLevel};

/// Default SQLite database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./goodrunss.db";

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `sqlx` connection URL (`sqlite:path` or `sqlite::memory:`)
    pub url: String,
    /// Run schema migrations on startup
    pub auto_migrate: bool,
}

/// CORS settings
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma separated allowed origins, or `*`
    pub allowed_origins: String,
}

/// Marketplace behaviour
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Insert sample listings when the listings table is empty
    pub seed_sample_data: bool,
    /// Location used to rank listings when the caller sends none
    pub default_location: Coordinates,
}

/// Outbound HTTP client timeouts
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Total request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

/// Main server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: IpAddr,
    /// HTTP port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database settings
    pub database: DatabaseConfig,
    /// CORS settings
    pub cors: CorsConfig,
    /// Marketplace settings
    pub marketplace: MarketplaceConfig,
    /// Outbound HTTP settings
    pub http_client: HttpClientConfig,
    /// Public base URL used to build OAuth redirect URIs
    pub public_base_url: String,
    /// Vendor credentials
    pub integrations: IntegrationsConfig,
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> AppResult<T> {
    match lookup(key).map(|v| v.trim().to_owned()) {
        Some(value) if !value.is_empty() => value
            .parse()
            .map_err(|_| AppError::config(format!("Invalid {key} value: {value}"))),
        _ => Ok(default),
    }
}

fn string_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

impl ServerConfig {
    /// Load configuration from environment variables, reading `.env` first
    ///
    /// # Errors
    ///
    /// Returns a config error if a numeric or boolean variable cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {e}");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns a config error if a numeric or boolean variable cannot be parsed
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_port = parse_or(&lookup, "HTTP_PORT", DEFAULT_HTTP_PORT)?;

        Ok(Self {
            host: parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?,
            http_port,
            environment: Environment::from_str_or_default(&string_or(
                &lookup,
                "ENVIRONMENT",
                "development",
            )),
            log_level: LogLevel::from_str_or_default(&string_or(&lookup, "RUST_LOG", "info")),
            database: DatabaseConfig {
                url: string_or(&lookup, "DATABASE_URL", DEFAULT_DATABASE_URL),
                auto_migrate: parse_or(&lookup, "AUTO_MIGRATE", true)?,
            },
            cors: CorsConfig {
                allowed_origins: string_or(&lookup, "CORS_ALLOWED_ORIGINS", "*"),
            },
            marketplace: MarketplaceConfig {
                seed_sample_data: parse_or(&lookup, "MARKETPLACE_SEED_SAMPLE_DATA", true)?,
                default_location: Coordinates::new(
                    parse_or(&lookup, "MARKETPLACE_DEFAULT_LAT", DEFAULT_LATITUDE)?,
                    parse_or(&lookup, "MARKETPLACE_DEFAULT_LON", DEFAULT_LONGITUDE)?,
                ),
            },
            http_client: HttpClientConfig {
                timeout_secs: parse_or(&lookup, "HTTP_CLIENT_TIMEOUT_SECS", 30)?,
                connect_timeout_secs: parse_or(&lookup, "HTTP_CLIENT_CONNECT_TIMEOUT_SECS", 10)?,
            },
            public_base_url: string_or(
                &lookup,
                "GOOGLE_REDIRECT_BASE_URL",
                &format!("http://localhost:{http_port}"),
            )
            .trim_end_matches('/')
            .to_owned(),
            integrations: IntegrationsConfig::from_lookup(&lookup),
        })
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        let enabled = self.integrations.enabled_vendors();
        format!(
            "GoodRunss Server Configuration:\n\
             - Bind: {}:{}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Auto Migrate: {}\n\
             - CORS Origins: {}\n\
             - Marketplace Seed Data: {}\n\
             - Enabled Integrations: {}",
            self.host,
            self.http_port,
            self.environment,
            self.log_level,
            self.database.url,
            self.database.auto_migrate,
            self.cors.allowed_origins,
            self.marketplace.seed_sample_data,
            enabled.join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.http_port, 8001);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert!(config.database.auto_migrate);
        assert_eq!(config.cors.allowed_origins, "*");
        assert!(config.marketplace.seed_sample_data);
        assert_eq!(config.public_base_url, "http://localhost:8001");
        assert!((config.marketplace.default_location.latitude - 40.7489).abs() < 1e-9);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("HTTP_PORT", "9000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("MARKETPLACE_SEED_SAMPLE_DATA", "false"),
            ("ENVIRONMENT", "production"),
            ("GOOGLE_REDIRECT_BASE_URL", "https://api.goodrunss.com/"),
        ]))
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert!(!config.marketplace.seed_sample_data);
        assert!(config.environment.is_production());
        assert_eq!(config.public_base_url, "https://api.goodrunss.com");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[("HTTP_PORT", "eighty")])).unwrap_err();
        assert!(err.message.contains("HTTP_PORT"));
    }
}
