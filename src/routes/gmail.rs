// ABOUTME: Gmail routes for connecting accounts, sending mail, and booking confirmations
// ABOUTME: Uses per-user Google OAuth credentials stored in the email integrations table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use goodrunss_core::errors::{AppError, AppResult};
use goodrunss_vendors::google::GMAIL_SCOPES;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::google::{self, OAuthCallbackQuery};
use crate::models::{Booking, Court, IntegrationProvider, User};
use crate::resources::ServerResources;

const CALLBACK_PATH: &str = "/api/v1/gmail/callback";
const DEFAULT_MAX_RESULTS: u32 = 10;

/// Body of `POST /send/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendEmailRequest {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// Query parameters for `GET /emails/{user_id}`
#[derive(Debug, Deserialize)]
pub struct ListEmailsQuery {
    /// Gmail search expression
    pub query: Option<String>,
    /// Maximum number of messages
    pub max_results: Option<u32>,
}

/// Body of `POST /send-booking-confirmation/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingConfirmationRequest {
    /// Booking to confirm
    pub booking_id: i64,
}

/// Subject and body of a booking confirmation email
#[must_use]
pub fn booking_confirmation_email(
    booking: &Booking,
    court: &Court,
    trainer: &User,
    player: &User,
) -> (String, String) {
    let subject = format!("Booking Confirmed: {}", court.name);
    let body = format!(
        "Hi {player},\n\n\
         Your training session is confirmed.\n\n\
         Court: {court}\n\
         Address: {address}\n\
         Trainer: {trainer}\n\
         Date: {date}\n\
         Time: {start} - {end} UTC\n\
         Total: ${price:.2}\n\n\
         Booking reference: #{id}\n\n\
         See you on the court!\n\
         The GoodRunss Team",
        player = player.name,
        court = court.name,
        address = court.address,
        trainer = trainer.name,
        date = booking.start_time.format("%A, %B %-d, %Y"),
        start = booking.start_time.format("%H:%M"),
        end = booking.end_time.format("%H:%M"),
        price = booking.total_price,
        id = booking.id,
    );
    (subject, body)
}

/// Validate a value that becomes a message header
fn require_header(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::missing_field(field));
    }
    if value.contains(['\r', '\n']) {
        return Err(AppError::invalid_input(format!(
            "{field} must not contain line breaks"
        )));
    }
    Ok(())
}

/// Gmail routes
pub struct GmailRoutes;

impl GmailRoutes {
    /// Create all Gmail routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/gmail/connect/:user_id", post(Self::handle_connect))
            .route("/api/v1/gmail/callback", get(Self::handle_callback))
            .route("/api/v1/gmail/send/:user_id", post(Self::handle_send))
            .route("/api/v1/gmail/emails/:user_id", get(Self::handle_list))
            .route(
                "/api/v1/gmail/send-booking-confirmation/:user_id",
                post(Self::handle_booking_confirmation),
            )
            .with_state(resources)
    }

    /// Handle POST /api/v1/gmail/connect/:user_id
    async fn handle_connect(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let body =
            google::authorization_response(&resources, user_id, &GMAIL_SCOPES, CALLBACK_PATH)
                .await?;
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle GET /api/v1/gmail/callback
    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<OAuthCallbackQuery>,
    ) -> Result<Response, AppError> {
        let user_id = google::complete_authorization(
            &resources,
            IntegrationProvider::Gmail,
            query,
            CALLBACK_PATH,
        )
        .await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Gmail connected successfully",
                "user_id": user_id,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/gmail/send/:user_id
    async fn handle_send(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<SendEmailRequest>,
    ) -> Result<Response, AppError> {
        require_header(&request.to, "to")?;
        require_header(&request.subject, "subject")?;

        let token = google::access_token(&resources, IntegrationProvider::Gmail, user_id).await?;
        let sent = resources
            .vendors
            .gmail
            .send_message(&token, request.to.trim(), &request.subject, &request.body)
            .await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message_id": sent.id,
                "thread_id": sent.thread_id,
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/gmail/emails/:user_id
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Query(query): Query<ListEmailsQuery>,
    ) -> Result<Response, AppError> {
        let token = google::access_token(&resources, IntegrationProvider::Gmail, user_id).await?;
        let search = query.query.as_deref().map(str::trim).filter(|q| !q.is_empty());

        let emails = resources
            .vendors
            .gmail
            .list_messages(&token, search, query.max_results.unwrap_or(DEFAULT_MAX_RESULTS))
            .await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": emails.len(),
                "emails": emails,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/gmail/send-booking-confirmation/:user_id
    async fn handle_booking_confirmation(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<BookingConfirmationRequest>,
    ) -> Result<Response, AppError> {
        let database = &resources.database;
        let booking = database
            .get_booking(request.booking_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Booking").with_resource_id(request.booking_id.to_string())
            })?;
        let court = database
            .get_court(booking.court_id)
            .await?
            .ok_or_else(|| AppError::not_found("Court"))?;
        let trainer = database
            .get_user(booking.trainer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trainer"))?;
        let player = database
            .get_user(booking.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let token = google::access_token(&resources, IntegrationProvider::Gmail, user_id).await?;
        let (subject, body) = booking_confirmation_email(&booking, &court, &trainer, &player);
        let sent = resources
            .vendors
            .gmail
            .send_message(&token, &player.email, &subject, &body)
            .await?;

        info!(booking_id = booking.id, message_id = %sent.id, "Booking confirmation sent");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Booking confirmation sent",
                "message_id": sent.id,
                "to": player.email,
            })),
        )
            .into_response())
    }
}
