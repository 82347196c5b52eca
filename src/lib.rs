// ABOUTME: Main library entry point for the GoodRunss backend API
// ABOUTME: Marketplace listings plus per-vendor integration routes for payments, messaging and scheduling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # GoodRunss Server
//!
//! HTTP backend for a sports training platform. It serves a geo-ranked
//! equipment marketplace and wraps third-party vendors behind `/api/v1`:
//! Stripe payouts, Twilio SMS, Gmail, Google Calendar, Instagram, Google
//! Maps, Zoom and WHOOP.
//!
//! ## Architecture
//!
//! - **Config**: environment and `.env` loading, vendor credential detection
//! - **Database**: `SQLite` persistence through `sqlx`
//! - **Resources**: shared state handed to every route
//! - **Routes**: one axum router per feature
//! - **Server**: router assembly, middleware and graceful shutdown
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use goodrunss_server::config::ServerConfig;
//! use goodrunss_server::database::Database;
//! use goodrunss_server::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::new(&config.database.url).await?;
//!     let addr = (config.host, config.http_port).into();
//!     let resources = Arc::new(ServerResources::new(database, config));
//!     goodrunss_server::server::serve(resources, addr).await
//! }
//! ```

/// Configuration loaded from the environment
pub mod config;

/// `SQLite` persistence
pub mod database;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Domain models
pub mod models;

/// Shared server resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Router assembly and serving
pub mod server;

pub use goodrunss_core::{constants, errors, geo};
