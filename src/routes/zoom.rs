// ABOUTME: Zoom routes for linking accounts and scheduling virtual training sessions
// ABOUTME: Meetings are created on the user's Zoom account and stored as virtual sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use goodrunss_core::constants::scheduling::DEFAULT_TIME_ZONE;
use goodrunss_core::errors::{AppError, AppResult, ErrorCode};
use goodrunss_vendors::zoom::NewMeeting;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::models::NewVirtualSession;
use crate::resources::ServerResources;

/// Body of `POST /connect/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConnectZoomRequest {
    /// Zoom OAuth access token
    pub access_token: String,
}

/// Body of `POST /create-virtual-session/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateVirtualSessionRequest {
    /// Trainer display name
    pub trainer_name: String,
    /// `training`, `consultation` or `group`
    pub session_type: Option<String>,
    /// Scheduled start
    pub start_time: DateTime<Utc>,
    /// Length in minutes
    pub duration_minutes: u32,
    /// Price in dollars
    pub price: Option<f64>,
}

impl CreateVirtualSessionRequest {
    fn meeting(&self) -> AppResult<NewMeeting> {
        let trainer = self.trainer_name.trim();
        if trainer.is_empty() {
            return Err(AppError::missing_field("trainer_name"));
        }
        if self.duration_minutes == 0 {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "duration_minutes must be greater than zero",
            ));
        }

        let topic = self.session_type.as_deref().map_or_else(
            || format!("Virtual Session with {trainer}"),
            |kind| format!("{} with {trainer}", session_label(kind)),
        );

        Ok(NewMeeting {
            topic,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            time_zone: DEFAULT_TIME_ZONE.to_owned(),
        })
    }
}

fn session_label(kind: &str) -> String {
    let mut chars = kind.trim().chars();
    chars.next().map_or_else(
        || "Virtual Session".to_owned(),
        |first| format!("{}{} Session", first.to_uppercase(), chars.as_str()),
    )
}

/// Zoom routes
pub struct ZoomRoutes;

impl ZoomRoutes {
    /// Create all Zoom routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/zoom/connect/:user_id", post(Self::handle_connect))
            .route(
                "/api/v1/zoom/create-virtual-session/:user_id",
                post(Self::handle_create_session),
            )
            .route(
                "/api/v1/zoom/virtual-sessions/:user_id",
                get(Self::handle_list_sessions),
            )
            .with_state(resources)
    }

    /// Handle POST /api/v1/zoom/connect/:user_id
    async fn handle_connect(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<ConnectZoomRequest>,
    ) -> Result<Response, AppError> {
        if resources.database.get_user(user_id).await?.is_none() {
            return Err(AppError::not_found("User").with_resource_id(user_id.to_string()));
        }
        let token = request.access_token.trim();
        if token.is_empty() {
            return Err(AppError::missing_field("access_token"));
        }

        let zoom_user = resources.vendors.zoom.current_user(token).await?;
        let integration = resources
            .database
            .upsert_zoom_integration(user_id, token, &zoom_user.id, zoom_user.email.as_deref())
            .await?;

        info!(user_id, "Zoom connected");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Zoom connected successfully",
                "integration": integration,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/zoom/create-virtual-session/:user_id
    async fn handle_create_session(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<CreateVirtualSessionRequest>,
    ) -> Result<Response, AppError> {
        let meeting = request.meeting()?;

        let integration = resources
            .database
            .get_zoom_integration(user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Zoom integration").with_resource_id(user_id.to_string())
            })?;
        let host = integration.zoom_user_id.as_deref().unwrap_or("me");

        let created = resources
            .vendors
            .zoom
            .create_meeting(&integration.access_token, host, &meeting)
            .await?;

        let session = resources
            .database
            .create_virtual_session(&NewVirtualSession {
                user_id,
                trainer_name: request.trainer_name.trim().to_owned(),
                session_type: request.session_type.clone(),
                start_time: request.start_time,
                duration_minutes: i64::from(request.duration_minutes),
                zoom_meeting_id: created.id.to_string(),
                zoom_join_url: created.join_url.clone(),
                zoom_start_url: created.start_url.clone(),
                price: request.price,
            })
            .await?;

        info!(user_id, session_id = session.id, meeting_id = created.id, "Virtual session scheduled");

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "session_id": session.id,
                "meeting_id": created.id,
                "join_url": created.join_url,
                "start_url": created.start_url,
                "session": session,
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/zoom/virtual-sessions/:user_id
    async fn handle_list_sessions(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let sessions = resources.database.list_virtual_sessions(user_id).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": sessions.len(),
                "sessions": sessions,
            })),
        )
            .into_response())
    }
}
