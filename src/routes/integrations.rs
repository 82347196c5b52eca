// ABOUTME: Integration status route reporting which vendor integrations are configured
// ABOUTME: Lists each vendor's enabled flag with its features or supported devices
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::resources::ServerResources;

/// Integration status routes
pub struct IntegrationRoutes;

impl IntegrationRoutes {
    /// Create the integration status route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/integrations/status", get(Self::handle_status))
            .with_state(resources)
    }

    /// Handle GET /integrations/status
    async fn handle_status(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(json!({
            "integrations": resources.config.integrations.status_report(),
        }))
    }
}
