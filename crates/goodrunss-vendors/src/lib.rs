// ABOUTME: Vendor API clients used by the GoodRunss integration routes
// ABOUTME: One module per vendor plus the shared HTTP client and circuit breaker
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

#![deny(unsafe_code)]

//! # GoodRunss Vendors
//!
//! Thin, typed clients over each vendor's hosted REST API. Every client:
//!
//! - shares one pooled `reqwest` client from [`http_client::shared_client`]
//! - wraps calls in its own [`circuit_breaker::CircuitBreaker`]
//! - maps HTTP failures into [`errors::VendorError`]
//! - accepts an overridable base URL so tests can run against a mock server

/// Circuit breaker guarding outbound vendor calls
pub mod circuit_breaker;
/// Vendor error type and `AppError` conversion
pub mod errors;
/// Google OAuth, Gmail, and Calendar clients
pub mod google;
/// Shared HTTP client
pub mod http_client;
/// Instagram Graph client
pub mod instagram;
/// Google Maps client
pub mod maps;
/// Stripe Connect client
pub mod stripe;
/// Twilio SMS client
pub mod twilio;
/// WHOOP developer API client
pub mod whoop;
/// Zoom client
pub mod zoom;

pub use errors::VendorError;
