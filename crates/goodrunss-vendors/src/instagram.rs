// ABOUTME: Instagram Graph API client for verifying accounts and publishing posts
// ABOUTME: Two-step publish flow of media container creation followed by publish
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::circuit_breaker::CircuitBreaker;
use crate::errors::VendorError;
use crate::http_client::{normalize_base_url, read_json, shared_client};

const VENDOR: &str = "Instagram";

/// Production Instagram Graph API base URL
pub const INSTAGRAM_API_BASE: &str = "https://graph.instagram.com";

/// Account behind an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramProfile {
    /// Instagram user id
    pub id: String,
    /// Handle
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphId {
    id: String,
}

/// Instagram Graph client authenticated per call with the user's token
#[derive(Debug)]
pub struct InstagramClient {
    base_url: String,
    breaker: CircuitBreaker,
}

impl Default for InstagramClient {
    fn default() -> Self {
        Self::new()
    }
}

impl InstagramClient {
    /// Create a client against the production API
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: INSTAGRAM_API_BASE.to_owned(),
            breaker: CircuitBreaker::new(VENDOR),
        }
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Resolve the account that owns `access_token`
    ///
    /// # Errors
    ///
    /// Returns `VendorError::AuthFailed` if the token is invalid
    #[instrument(skip_all, fields(vendor = VENDOR))]
    pub async fn verify_token(&self, access_token: &str) -> Result<InstagramProfile, VendorError> {
        self.breaker
            .call(async {
                let response = shared_client()
                    .get(format!("{}/me", self.base_url))
                    .query(&[("fields", "id,username"), ("access_token", access_token)])
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await
    }

    /// Create an image container and publish it, returning the media id
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if either step is refused
    #[instrument(skip(self, access_token, caption), fields(vendor = VENDOR))]
    pub async fn publish_image(
        &self,
        instagram_user_id: &str,
        access_token: &str,
        image_url: &str,
        caption: &str,
    ) -> Result<String, VendorError> {
        let container: GraphId = self
            .breaker
            .call(async {
                let response = shared_client()
                    .post(format!("{}/{instagram_user_id}/media", self.base_url))
                    .form(&[
                        ("image_url", image_url),
                        ("caption", caption),
                        ("access_token", access_token),
                    ])
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;

        let published: GraphId = self
            .breaker
            .call(async {
                let response = shared_client()
                    .post(format!("{}/{instagram_user_id}/media_publish", self.base_url))
                    .form(&[
                        ("creation_id", container.id.as_str()),
                        ("access_token", access_token),
                    ])
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;

        info!(media_id = %published.id, "Instagram post published");
        Ok(published.id)
    }
}
