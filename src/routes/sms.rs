// ABOUTME: Twilio SMS routes for notifications and phone-based two-factor verification
// ABOUTME: Every outbound message is logged with its Twilio sid and delivery status
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
use chrono::{Duration, Utc};
use goodrunss_core::constants::phone::{DEFAULT_COUNTRY_CODE, MAX_DIGITS, MIN_DIGITS};
use goodrunss_core::constants::two_factor::{CODE_LENGTH, CODE_TTL_MINUTES};
use goodrunss_core::errors::{AppError, AppResult};
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::resources::ServerResources;

/// Body of `POST /send/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendSmsRequest {
    /// Destination in E.164 form
    pub phone_number: String,
    /// Message text
    pub message: String,
}

/// Body of `POST /send-2fa/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendCodeRequest {
    /// Destination in E.164 form
    pub phone_number: String,
}

/// Body of `POST /verify-2fa/{user_id}`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VerifyCodeRequest {
    /// Phone number the code was sent to
    pub phone_number: String,
    /// Code entered by the user
    pub code: String,
}

/// Random numeric verification code with leading zeros kept
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10_u8)))
        .collect()
}

/// Reduce a phone number to E.164
///
/// Spaces, dashes, dots and parentheses are dropped. A bare ten-digit
/// number gets the default country code; anything else must start with `+`.
fn normalized_phone(raw: &str) -> AppResult<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '(' | ')'))
        .collect();
    if compact.is_empty() {
        return Err(AppError::missing_field("phone_number"));
    }

    let digits = match compact.strip_prefix('+') {
        Some(rest) => rest.to_owned(),
        None if compact.len() == 10 => format!("{DEFAULT_COUNTRY_CODE}{compact}"),
        None => {
            return Err(AppError::invalid_input(
                "phone_number must include a country code, e.g. +15550100000",
            ))
        }
    };

    let valid = (MIN_DIGITS..=MAX_DIGITS).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !digits.starts_with('0');
    if !valid {
        return Err(AppError::invalid_input(format!(
            "phone_number is not a valid E.164 number: {raw}"
        )));
    }
    Ok(format!("+{digits}"))
}

/// Twilio SMS routes
pub struct SmsRoutes;

impl SmsRoutes {
    /// Create all SMS routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/v1/sms/send/:user_id", post(Self::handle_send))
            .route("/api/v1/sms/send-2fa/:user_id", post(Self::handle_send_code))
            .route("/api/v1/sms/verify-2fa/:user_id", post(Self::handle_verify_code))
            .route("/api/v1/sms/history/:user_id", get(Self::handle_history))
            .with_state(resources)
    }

    async fn require_user(resources: &ServerResources, user_id: i64) -> AppResult<()> {
        if resources.database.get_user(user_id).await?.is_none() {
            return Err(AppError::not_found("User").with_resource_id(user_id.to_string()));
        }
        Ok(())
    }

    /// Handle POST /api/v1/sms/send/:user_id
    async fn handle_send(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<SendSmsRequest>,
    ) -> Result<Response, AppError> {
        let twilio = resources.twilio()?;
        Self::require_user(&resources, user_id).await?;

        let phone = normalized_phone(&request.phone_number)?;
        if request.message.trim().is_empty() {
            return Err(AppError::missing_field("message"));
        }

        let sent = twilio.send_sms(&phone, &request.message).await?;
        let log_id = resources
            .database
            .log_sms(user_id, &phone, &request.message, &sent.sid, &sent.status)
            .await?;

        info!(user_id, sid = %sent.sid, "SMS sent");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message_sid": sent.sid,
                "status": sent.status,
                "log_id": log_id,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/sms/send-2fa/:user_id
    async fn handle_send_code(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<SendCodeRequest>,
    ) -> Result<Response, AppError> {
        let twilio = resources.twilio()?;
        Self::require_user(&resources, user_id).await?;
        let phone = normalized_phone(&request.phone_number)?;

        let code = generate_code(&mut rand::thread_rng());
        let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);
        resources
            .database
            .store_two_factor_code(user_id, &phone, &code, expires_at)
            .await?;

        let body = format!(
            "Your GoodRunss verification code is: {code}. It expires in {CODE_TTL_MINUTES} minutes."
        );
        let sent = twilio.send_sms(&phone, &body).await?;
        resources
            .database
            .log_sms(user_id, &phone, "2FA verification code", &sent.sid, &sent.status)
            .await?;

        info!(user_id, "Verification code sent");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Verification code sent",
                "expires_in_minutes": CODE_TTL_MINUTES,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/sms/verify-2fa/:user_id
    async fn handle_verify_code(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
        Json(request): Json<VerifyCodeRequest>,
    ) -> Result<Response, AppError> {
        let phone = normalized_phone(&request.phone_number)?;
        let code = request.code.trim();

        let accepted = resources
            .database
            .consume_two_factor_code(user_id, &phone, code, Utc::now())
            .await?;
        if !accepted {
            return Err(AppError::invalid_input("Invalid or expired verification code"));
        }

        info!(user_id, "Phone number verified");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Phone number verified",
                "verified": true,
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/sms/history/:user_id
    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let messages = resources.database.list_sms_logs(user_id).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": messages.len(),
                "messages": messages,
            })),
        )
            .into_response())
    }
}
