// ABOUTME: Route module organization for the GoodRunss HTTP API
// ABOUTME: One module per domain, each exposing a Routes type that builds its axum Router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! Route modules for the GoodRunss server
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to the database layer and the vendor clients held in
//! [`crate::resources::ServerResources`].

/// Achievement unlock, share, and leaderboard routes
pub mod achievements;
/// Google Calendar routes
pub mod calendar;
/// Gmail routes
pub mod gmail;
/// Google OAuth helpers shared by Gmail and Calendar
pub mod google;
/// Root banner and health check routes
pub mod health;
/// Instagram routes
pub mod instagram;
/// Integration status route
pub mod integrations;
/// Google Maps routes
pub mod maps;
/// Marketplace listing routes
pub mod marketplace;
/// `OpenAPI` documentation routes (feature-gated)
#[cfg(feature = "openapi")]
pub mod openapi;
/// Stripe payment routes
pub mod payments;
/// Twilio SMS routes
pub mod sms;
/// Wearable device routes
pub mod wearables;
/// Zoom routes
pub mod zoom;

pub use achievements::AchievementRoutes;
pub use calendar::CalendarRoutes;
pub use gmail::GmailRoutes;
pub use health::HealthRoutes;
pub use instagram::InstagramRoutes;
pub use integrations::IntegrationRoutes;
pub use maps::MapsRoutes;
pub use marketplace::MarketplaceRoutes;
#[cfg(feature = "openapi")]
pub use openapi::OpenApiRoutes;
pub use payments::PaymentRoutes;
pub use sms::SmsRoutes;
pub use wearables::WearableRoutes;
pub use zoom::ZoomRoutes;
