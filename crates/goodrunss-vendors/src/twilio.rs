// ABOUTME: Twilio Programmable Messaging client for outbound SMS
// ABOUTME: Sends text messages from the configured platform number
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::circuit_breaker::CircuitBreaker;
use crate::errors::VendorError;
use crate::http_client::{normalize_base_url, read_json, shared_client};

const VENDOR: &str = "Twilio";

/// Production Twilio API base URL
pub const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Account credentials and sender number
#[derive(Debug, Clone)]
pub struct TwilioCredentials {
    /// Account SID (`AC...`)
    pub account_sid: String,
    /// Auth token paired with the SID
    pub auth_token: String,
    /// E.164 number messages are sent from
    pub from_number: String,
}

/// Message resource returned after sending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsMessage {
    /// Message SID (`SM...`)
    pub sid: String,
    /// Delivery status (`queued`, `sent`, ...)
    pub status: String,
}

/// Twilio REST client
#[derive(Debug)]
pub struct TwilioClient {
    credentials: TwilioCredentials,
    base_url: String,
    breaker: CircuitBreaker,
}

impl TwilioClient {
    /// Create a client against the production API
    #[must_use]
    pub fn new(credentials: TwilioCredentials) -> Self {
        Self {
            credentials,
            base_url: TWILIO_API_BASE.to_owned(),
            breaker: CircuitBreaker::new(VENDOR),
        }
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Sender number used for outbound messages
    #[must_use]
    pub fn from_number(&self) -> &str {
        &self.credentials.from_number
    }

    /// Send a text message
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if Twilio rejects the number or is unreachable
    #[instrument(skip(self, body), fields(vendor = VENDOR))]
    pub async fn send_sms(&self, to: &str, body: &str) -> Result<SmsMessage, VendorError> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url, self.credentials.account_sid
        );
        let form = [
            ("To", to),
            ("From", self.credentials.from_number.as_str()),
            ("Body", body),
        ];

        let message: SmsMessage = self
            .breaker
            .call(async {
                let response = shared_client()
                    .post(&url)
                    .basic_auth(
                        &self.credentials.account_sid,
                        Some(&self.credentials.auth_token),
                    )
                    .form(&form)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;

        info!(sid = %message.sid, status = %message.status, "SMS queued");
        Ok(message)
    }
}
