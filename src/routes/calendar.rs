// ABOUTME: Google Calendar routes for connecting calendars and syncing bookings as events
// ABOUTME: Events use the default time zone with email and popup reminders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use goodrunss_core::constants::scheduling::{
    DEFAULT_DAYS_AHEAD, DEFAULT_TIME_ZONE, EMAIL_REMINDER_MINUTES, POPUP_REMINDER_MINUTES,
};
use goodrunss_core::errors::{AppError, AppResult, ErrorCode};
use goodrunss_vendors::google::{NewCalendarEvent, CALENDAR_SCOPES};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::google::{self, OAuthCallbackQuery};
use crate::models::{Booking, Court, IntegrationProvider, User};
use crate::resources::ServerResources;

const CALLBACK_PATH: &str = "/api/v1/calendar/callback";
const MAX_EVENTS: u32 = 50;

/// Body of `POST /create-event/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateEventRequest {
    /// Event title
    pub title: String,
    /// Event description
    pub description: Option<String>,
    /// Start instant
    pub start_time: DateTime<Utc>,
    /// End instant, after the start
    pub end_time: DateTime<Utc>,
    /// Free-form location
    pub location: Option<String>,
    /// Attendee email addresses
    #[serde(default)]
    pub attendees: Vec<String>,
}

/// Query parameters for `GET /events/{user_id}`
#[derive(Debug, Deserialize)]
pub struct UpcomingEventsQuery {
    /// Size of the window starting now
    pub days_ahead: Option<i64>,
}

impl CreateEventRequest {
    /// Validate and convert into a calendar event
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title or an end that is not
    /// after the start
    pub fn into_event(self) -> AppResult<NewCalendarEvent> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::missing_field("title"));
        }
        if self.end_time <= self.start_time {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "end_time must be after start_time",
            ));
        }

        Ok(scheduled_event(
            title.to_owned(),
            self.description,
            self.location,
            self.start_time,
            self.end_time,
            self.attendees
                .into_iter()
                .map(|a| a.trim().to_owned())
                .filter(|a| !a.is_empty())
                .collect(),
        ))
    }
}

fn scheduled_event(
    summary: String,
    description: Option<String>,
    location: Option<String>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    attendees: Vec<String>,
) -> NewCalendarEvent {
    NewCalendarEvent {
        summary,
        description,
        location,
        start,
        end,
        time_zone: DEFAULT_TIME_ZONE.to_owned(),
        attendees,
        email_reminder_minutes: EMAIL_REMINDER_MINUTES,
        popup_reminder_minutes: POPUP_REMINDER_MINUTES,
    }
}

/// Calendar event describing a court booking
#[must_use]
pub fn booking_event(booking: &Booking, court: &Court, trainer: &User, player: &User) -> NewCalendarEvent {
    scheduled_event(
        format!("Training Session at {}", court.name),
        Some(format!(
            "Trainer: {}\nCourt: {}\nPrice: ${:.2}\nBooking #{}",
            trainer.name, court.name, booking.total_price, booking.id
        )),
        Some(court.address.clone()),
        booking.start_time,
        booking.end_time,
        vec![player.email.clone(), trainer.email.clone()],
    )
}

/// Google Calendar routes
pub struct CalendarRoutes;

impl CalendarRoutes {
    /// Create all calendar routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/calendar/connect/:user_id", post(Self::handle_connect))
            .route("/api/v1/calendar/callback", get(Self::handle_callback))
            .route(
                "/api/v1/calendar/create-event/:user_id",
                post(Self::handle_create_event),
            )
            .route(
                "/api/v1/calendar/sync-booking/:user_id/:booking_id",
                post(Self::handle_sync_booking),
            )
            .route("/api/v1/calendar/events/:user_id", get(Self::handle_events))
            .route(
                "/api/v1/calendar/event/:user_id/:event_id",
                delete(Self::handle_delete_event),
            )
            .with_state(resources)
    }

    /// Handle POST /api/v1/calendar/connect/:user_id
    async fn handle_connect(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let body =
            google::authorization_response(&resources, user_id, &CALENDAR_SCOPES, CALLBACK_PATH)
                .await?;
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle GET /api/v1/calendar/callback
    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<OAuthCallbackQuery>,
    ) -> Result<Response, AppError> {
        let user_id = google::complete_authorization(
            &resources,
            IntegrationProvider::GoogleCalendar,
            query,
            CALLBACK_PATH,
        )
        .await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Google Calendar connected successfully",
                "user_id": user_id,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/calendar/create-event/:user_id
    async fn handle_create_event(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<CreateEventRequest>,
    ) -> Result<Response, AppError> {
        let event = request.into_event()?;
        let token =
            google::access_token(&resources, IntegrationProvider::GoogleCalendar, user_id).await?;
        let created = resources.vendors.calendar.insert_event(&token, &event).await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "event_id": created.id,
                "html_link": created.html_link,
                "event": created,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/calendar/sync-booking/:user_id/:booking_id
    async fn handle_sync_booking(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, booking_id)): Path<(i64, i64)>,
    ) -> Result<Response, AppError> {
        let database = &resources.database;
        let booking = database
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking").with_resource_id(booking_id.to_string()))?;
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

        let token =
            google::access_token(&resources, IntegrationProvider::GoogleCalendar, user_id).await?;
        let event = booking_event(&booking, &court, &trainer, &player);
        let created = resources.vendors.calendar.insert_event(&token, &event).await?;

        info!(booking_id, event_id = %created.id, "Booking synced to calendar");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Booking synced to calendar",
                "event_id": created.id,
                "html_link": created.html_link,
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/calendar/events/:user_id
    async fn handle_events(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Query(query): Query<UpcomingEventsQuery>,
    ) -> Result<Response, AppError> {
        let days_ahead = query.days_ahead.unwrap_or(DEFAULT_DAYS_AHEAD);
        if days_ahead < 1 {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "days_ahead must be at least 1",
            ));
        }

        let token =
            google::access_token(&resources, IntegrationProvider::GoogleCalendar, user_id).await?;
        let now = Utc::now();
        let events = resources
            .vendors
            .calendar
            .list_events(&token, now, now + Duration::days(days_ahead), MAX_EVENTS)
            .await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": events.len(),
                "events": events,
            })),
        )
            .into_response())
    }

    /// Handle DELETE /api/v1/calendar/event/:user_id/:event_id
    async fn handle_delete_event(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, event_id)): Path<(i64, String)>,
    ) -> Result<Response, AppError> {
        let token =
            google::access_token(&resources, IntegrationProvider::GoogleCalendar, user_id).await?;
        resources.vendors.calendar.delete_event(&token, &event_id).await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Event deleted",
                "event_id": event_id,
            })),
        )
            .into_response())
    }
}
