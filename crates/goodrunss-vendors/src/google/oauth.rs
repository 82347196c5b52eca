// ABOUTME: Google OAuth 2.0 client for the authorization code flow
// ABOUTME: Builds consent URLs, exchanges codes, and refreshes stored access tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::form_urlencoded;

use crate::circuit_breaker::CircuitBreaker;
use crate::errors::VendorError;
use crate::http_client::{read_json, shared_client};

const VENDOR: &str = "Google OAuth";

/// Google consent screen endpoint
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Seconds subtracted from token lifetimes so a token is never used right at expiry
const EXPIRY_SKEW_SECS: i64 = 60;

/// OAuth application registered in the Google console
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
}

/// Token endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTokens {
    /// Bearer token for API calls
    pub access_token: String,
    /// Long-lived refresh token (only on first consent)
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds
    pub expires_in: Option<i64>,
    /// Space separated granted scopes
    pub scope: Option<String>,
}

/// Credentials persisted per user and integration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleCredentials {
    /// Current access token
    pub access_token: String,
    /// Refresh token used to mint new access tokens
    pub refresh_token: Option<String>,
    /// When the access token stops being valid
    pub expires_at: Option<DateTime<Utc>>,
    /// Granted scopes
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl GoogleCredentials {
    /// Build stored credentials from a token response
    #[must_use]
    pub fn from_tokens(tokens: GoogleTokens, now: DateTime<Utc>) -> Self {
        Self {
            expires_at: tokens
                .expires_in
                .map(|secs| now + Duration::seconds(secs - EXPIRY_SKEW_SECS)),
            scopes: tokens
                .scope
                .as_deref()
                .map(|s| s.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }

    /// Whether the access token must be refreshed before use
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Merge a refresh response, keeping the old refresh token when none is returned
    #[must_use]
    pub fn refreshed(self, tokens: GoogleTokens, now: DateTime<Utc>) -> Self {
        let previous_refresh = self.refresh_token;
        let previous_scopes = self.scopes;
        let mut updated = Self::from_tokens(tokens, now);
        if updated.refresh_token.is_none() {
            updated.refresh_token = previous_refresh;
        }
        if updated.scopes.is_empty() {
            updated.scopes = previous_scopes;
        }
        updated
    }
}

/// Client for Google's OAuth endpoints
#[derive(Debug)]
pub struct GoogleOAuthClient {
    config: GoogleOAuthConfig,
    auth_url: String,
    token_url: String,
    breaker: CircuitBreaker,
}

impl GoogleOAuthClient {
    /// Create a client against Google's production endpoints
    #[must_use]
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            config,
            auth_url: GOOGLE_AUTH_URL.to_owned(),
            token_url: GOOGLE_TOKEN_URL.to_owned(),
            breaker: CircuitBreaker::new(VENDOR),
        }
    }

    /// Use a different token endpoint
    #[must_use]
    pub fn with_token_url(mut self, token_url: &str) -> Self {
        self.token_url = token_url.to_owned();
        self
    }

    /// Build the consent URL the user must visit
    ///
    /// Requests offline access so a refresh token is issued, and forces the
    /// consent prompt so reconnecting returns a fresh refresh token.
    #[must_use]
    pub fn authorization_url(&self, scopes: &[&str], redirect_uri: &str, state: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &scopes.join(" "))
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("state", state)
            .finish();
        format!("{}?{query}", self.auth_url)
    }

    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if the code is invalid or Google fails
    #[instrument(skip(self, code), fields(vendor = VENDOR))]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleTokens, VendorError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        self.post_token_form(&form).await
    }

    /// Mint a new access token from a refresh token
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if the refresh token was revoked or Google fails
    #[instrument(skip_all, fields(vendor = VENDOR))]
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<GoogleTokens, VendorError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        debug!("Refreshing Google access token");
        self.post_token_form(&form).await
    }

    async fn post_token_form(&self, form: &[(&str, &str)]) -> Result<GoogleTokens, VendorError> {
        self.breaker
            .call(async {
                let response = shared_client()
                    .post(&self.token_url)
                    .form(form)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleOAuthClient {
        GoogleOAuthClient::new(GoogleOAuthConfig {
            client_id: "client-123".to_owned(),
            client_secret: "secret".to_owned(),
        })
    }

    #[test]
    fn test_authorization_url_encodes_parameters() {
        let url = client().authorization_url(
            &["https://www.googleapis.com/auth/calendar"],
            "http://localhost:8001/api/v1/calendar/callback",
            "42",
        );
        assert!(url.starts_with(GOOGLE_AUTH_URL));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("state=42"));
        assert!(url.contains(
            "scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fcalendar"
        ));
    }

    #[test]
    fn test_credentials_expiry() {
        let now = Utc::now();
        let creds = GoogleCredentials::from_tokens(
            GoogleTokens {
                access_token: "a".to_owned(),
                refresh_token: Some("r".to_owned()),
                expires_in: Some(3600),
                scope: Some("s1 s2".to_owned()),
            },
            now,
        );
        assert!(!creds.is_expired(now));
        assert!(creds.is_expired(now + Duration::seconds(3600)));
        assert_eq!(creds.scopes, vec!["s1", "s2"]);
    }

    #[test]
    fn test_refresh_keeps_refresh_token() {
        let now = Utc::now();
        let creds = GoogleCredentials {
            access_token: "old".to_owned(),
            refresh_token: Some("keep-me".to_owned()),
            expires_at: Some(now),
            scopes: vec!["s1".to_owned()],
        };
        let updated = creds.refreshed(
            GoogleTokens {
                access_token: "new".to_owned(),
                refresh_token: None,
                expires_in: Some(3600),
                scope: None,
            },
            now,
        );
        assert_eq!(updated.access_token, "new");
        assert_eq!(updated.refresh_token.as_deref(), Some("keep-me"));
        assert_eq!(updated.scopes, vec!["s1"]);
    }
}
