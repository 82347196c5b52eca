// ABOUTME: Google OAuth helpers shared by the Gmail and Calendar routes
// ABOUTME: Builds consent URLs, completes callbacks, and refreshes stored access tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::Utc;
use goodrunss_core::errors::{AppError, AppResult, ErrorCode};
use goodrunss_vendors::google::GoogleCredentials;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::models::IntegrationProvider;
use crate::resources::ServerResources;

/// Query parameters Google sends to an OAuth callback
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    /// Authorization code
    pub code: Option<String>,
    /// User id passed through the consent screen
    pub state: Option<String>,
    /// Error reported when the user denies consent
    pub error: Option<String>,
}

/// Consent URL response for `POST /connect/{user_id}`
///
/// # Errors
///
/// Returns `CONFIG_MISSING` when Google OAuth is not configured and 404 when
/// the user does not exist
pub async fn authorization_response(
    resources: &ServerResources,
    user_id: i64,
    scopes: &[&str],
    callback_path: &str,
) -> AppResult<Value> {
    let oauth = resources.google_oauth()?;
    if resources.database.get_user(user_id).await?.is_none() {
        return Err(AppError::not_found("User").with_resource_id(user_id.to_string()));
    }

    let url = oauth.authorization_url(
        scopes,
        &resources.redirect_uri(callback_path),
        &user_id.to_string(),
    );

    Ok(json!({
        "success": true,
        "authorization_url": url,
        "status": "pending_authorization",
    }))
}

/// Exchange the callback code and store the credentials, returning the user id
///
/// # Errors
///
/// Returns a validation error when the code or state is missing or consent
/// was denied, and a vendor error when the exchange fails
pub async fn complete_authorization(
    resources: &ServerResources,
    provider: IntegrationProvider,
    query: OAuthCallbackQuery,
    callback_path: &str,
) -> AppResult<i64> {
    let oauth = resources.google_oauth()?;

    if let Some(error) = query.error {
        return Err(AppError::new(
            ErrorCode::ExternalAuthFailed,
            format!("Google authorization failed: {error}"),
        ));
    }
    let code = query.code.ok_or_else(|| AppError::missing_field("code"))?;
    let user_id: i64 = query
        .state
        .ok_or_else(|| AppError::missing_field("state"))?
        .parse()
        .map_err(|_| AppError::invalid_input("state must be a user id"))?;

    let tokens = oauth
        .exchange_code(&code, &resources.redirect_uri(callback_path))
        .await?;
    let credentials = GoogleCredentials::from_tokens(tokens, Utc::now());

    resources
        .database
        .save_google_integration(provider, user_id, &credentials)
        .await?;

    info!(user_id, provider = provider.provider(), "Google account connected");
    Ok(user_id)
}

/// Valid access token for a connected user, refreshing and persisting it when expired
///
/// # Errors
///
/// Returns 404 when the user has not connected the provider, and an auth
/// error when the token expired without a refresh token
pub async fn access_token(
    resources: &ServerResources,
    provider: IntegrationProvider,
    user_id: i64,
) -> AppResult<String> {
    let integration = resources
        .database
        .get_google_integration(provider, user_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("{} integration", provider.provider()))
                .with_resource_id(user_id.to_string())
        })?;

    let now = Utc::now();
    if !integration.credentials.is_expired(now) {
        return Ok(integration.credentials.access_token);
    }

    let refresh_token = integration
        .credentials
        .refresh_token
        .clone()
        .ok_or_else(|| {
            AppError::new(
                ErrorCode::ExternalAuthFailed,
                "Google access expired; reconnect the account",
            )
        })?;

    debug!(user_id, provider = provider.provider(), "Refreshing expired Google token");
    let tokens = resources
        .google_oauth()?
        .refresh_access_token(&refresh_token)
        .await?;
    let credentials = integration.credentials.refreshed(tokens, now);

    resources
        .database
        .update_google_credentials(provider, integration.id, &credentials)
        .await?;

    Ok(credentials.access_token)
}
