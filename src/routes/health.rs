// ABOUTME: Root banner and health check route handlers
// ABOUTME: Reports service identity, enabled integrations, and liveness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! Health check routes for service monitoring

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use goodrunss_core::constants::service::{API_BANNER, SERVICE_NAME};
use serde_json::{json, Value};

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the root and health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        async fn root_handler(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
            Json(json!({
                "message": API_BANNER,
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "status": "active",
                "integrations": resources.config.integrations.enabled_vendors(),
                "docs": "/docs",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }))
        }

        async fn health_handler() -> Json<Value> {
            Json(json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }))
        }

        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .with_state(resources)
    }
}
