// ABOUTME: Instagram routes for linking accounts and posting unlocked achievements
// ABOUTME: Publishing goes through the Graph API two-step container flow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use goodrunss_core::constants::vendors::INSTAGRAM;
use goodrunss_core::errors::AppError;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::resources::ServerResources;

/// Body of `POST /connect/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConnectInstagramRequest {
    /// Long-lived Graph API token
    pub access_token: String,
}

/// Body of `POST /post-achievement/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PostAchievementRequest {
    /// Achievement name
    pub achievement_name: String,
    /// Achievement description
    pub achievement_description: String,
    /// Public image URL to publish
    pub achievement_image_url: String,
}

/// Caption posted with an achievement image
#[must_use]
pub fn achievement_caption(name: &str, description: &str) -> String {
    format!(
        "🏆 Achievement Unlocked: {name}!\n\n{description}\n\n#GoodRunss #Sports #Achievement #Fitness"
    )
}

/// Instagram routes
pub struct InstagramRoutes;

impl InstagramRoutes {
    /// Create all Instagram routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/instagram/connect/:user_id", post(Self::handle_connect))
            .route(
                "/api/v1/instagram/post-achievement/:user_id",
                post(Self::handle_post_achievement),
            )
            .with_state(resources)
    }

    /// Handle POST /api/v1/instagram/connect/:user_id
    async fn handle_connect(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<ConnectInstagramRequest>,
    ) -> Result<Response, AppError> {
        if resources.database.get_user(user_id).await?.is_none() {
            return Err(AppError::not_found("User").with_resource_id(user_id.to_string()));
        }
        let token = request.access_token.trim();
        if token.is_empty() {
            return Err(AppError::missing_field("access_token"));
        }

        let profile = resources.vendors.instagram.verify_token(token).await?;
        let integration = resources
            .database
            .upsert_social_integration(
                user_id,
                INSTAGRAM,
                token,
                &profile.id,
                profile.username.as_deref(),
            )
            .await?;

        info!(user_id, username = ?profile.username, "Instagram connected");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Instagram connected successfully",
                "username": profile.username,
                "integration": integration,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/instagram/post-achievement/:user_id
    async fn handle_post_achievement(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<PostAchievementRequest>,
    ) -> Result<Response, AppError> {
        let integration = resources
            .database
            .get_social_integration(user_id, INSTAGRAM)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Instagram integration").with_resource_id(user_id.to_string())
            })?;
        let instagram_user_id = integration
            .provider_user_id
            .as_deref()
            .ok_or_else(|| AppError::invalid_input("Instagram account id unknown; reconnect"))?;

        let caption =
            achievement_caption(&request.achievement_name, &request.achievement_description);
        let media_id = resources
            .vendors
            .instagram
            .publish_image(
                instagram_user_id,
                &integration.access_token,
                &request.achievement_image_url,
                &caption,
            )
            .await?;

        info!(user_id, media_id = %media_id, "Achievement posted to Instagram");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Achievement posted to Instagram",
                "media_id": media_id,
            })),
        )
            .into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption() {
        let caption = achievement_caption("Perfect Game", "Scored 100");
        assert!(caption.starts_with("🏆 Achievement Unlocked: Perfect Game!"));
        assert!(caption.contains("Scored 100"));
        assert!(caption.ends_with("#Fitness"));
    }
}
