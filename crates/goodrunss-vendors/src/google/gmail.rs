// ABOUTME: Gmail REST client for sending and listing messages
// ABOUTME: Encodes RFC 2822 messages and reads subject, sender, and date headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::circuit_breaker::CircuitBreaker;
use crate::errors::VendorError;
use crate::http_client::{normalize_base_url, read_json, shared_client};

const VENDOR: &str = "Gmail";

/// Production Gmail API base URL
pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

/// Scopes requested when connecting Gmail
pub const GMAIL_SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/gmail.send",
    "https://www.googleapis.com/auth/gmail.modify",
];

/// Result of sending a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentMessage {
    /// Gmail message id
    pub id: String,
    /// Thread the message was added to
    #[serde(rename = "threadId")]
    pub thread_id: Option<String>,
}

/// Condensed view of a mailbox message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailSummary {
    /// Gmail message id
    pub id: String,
    /// `Subject` header
    pub subject: String,
    /// `From` header
    pub from: String,
    /// `Date` header
    pub date: String,
    /// Short plain-text preview
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageMetadata {
    id: String,
    #[serde(default)]
    snippet: String,
    payload: Option<MessagePayload>,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<MessageHeader>,
}

#[derive(Debug, Deserialize)]
struct MessageHeader {
    name: String,
    value: String,
}

impl MessageMetadata {
    fn header(&self, name: &str) -> String {
        self.payload
            .as_ref()
            .and_then(|payload| {
                payload
                    .headers
                    .iter()
                    .find(|h| h.name.eq_ignore_ascii_case(name))
            })
            .map(|h| h.value.clone())
            .unwrap_or_default()
    }

    fn into_summary(self) -> EmailSummary {
        EmailSummary {
            subject: self.header("Subject"),
            from: self.header("From"),
            date: self.header("Date"),
            id: self.id,
            snippet: self.snippet,
        }
    }
}

/// Collapse line breaks so a value cannot start a new header
fn single_line(value: &str) -> String {
    value
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Subject header value, as an RFC 2047 encoded word when it is not ASCII
fn encode_subject(subject: &str) -> String {
    let subject = single_line(subject);
    if subject.is_ascii() {
        subject
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(subject.as_bytes()))
    }
}

/// Encode a plain-text message in the `raw` format Gmail expects
///
/// Header values are folded onto one line.
#[must_use]
pub fn encode_raw_message(to: &str, subject: &str, body: &str) -> String {
    let message = format!(
        "To: {to}\r\nSubject: {subject}\r\nMIME-Version: 1.0\r\nContent-Type: text/plain; charset=\"UTF-8\"\r\n\r\n{body}",
        to = single_line(to),
        subject = encode_subject(subject),
    );
    URL_SAFE.encode(message.as_bytes())
}

/// Gmail client authenticated per call with the user's access token
#[derive(Debug)]
pub struct GmailClient {
    base_url: String,
    breaker: CircuitBreaker,
}

impl Default for GmailClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GmailClient {
    /// Create a client against the production API
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: GMAIL_API_BASE.to_owned(),
            breaker: CircuitBreaker::new(VENDOR),
        }
    }

    /// Point the client at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Send a plain-text email from the user's mailbox
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if the token is rejected or Gmail fails
    #[instrument(skip(self, access_token, body), fields(vendor = VENDOR))]
    pub async fn send_message(
        &self,
        access_token: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<SentMessage, VendorError> {
        let payload = serde_json::json!({ "raw": encode_raw_message(to, subject, body) });

        let sent: SentMessage = self
            .breaker
            .call(async {
                let response = shared_client()
                    .post(format!("{}/users/me/messages/send", self.base_url))
                    .bearer_auth(access_token)
                    .json(&payload)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;

        info!(message_id = %sent.id, "Email sent");
        Ok(sent)
    }

    /// List messages matching a Gmail search query with their headers
    ///
    /// # Errors
    ///
    /// Returns a `VendorError` if the token is rejected or Gmail fails
    #[instrument(skip(self, access_token), fields(vendor = VENDOR))]
    pub async fn list_messages(
        &self,
        access_token: &str,
        query: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<EmailSummary>, VendorError> {
        let mut params = vec![("maxResults", max_results.to_string())];
        if let Some(query) = query {
            params.push(("q", query.to_owned()));
        }

        let list: MessageList = self
            .breaker
            .call(async {
                let response = shared_client()
                    .get(format!("{}/users/me/messages", self.base_url))
                    .bearer_auth(access_token)
                    .query(&params)
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;

        let mut summaries = Vec::with_capacity(list.messages.len());
        for message in list.messages {
            summaries.push(self.message_summary(access_token, &message.id).await?);
        }
        Ok(summaries)
    }

    async fn message_summary(
        &self,
        access_token: &str,
        message_id: &str,
    ) -> Result<EmailSummary, VendorError> {
        let metadata: MessageMetadata = self
            .breaker
            .call(async {
                let response = shared_client()
                    .get(format!("{}/users/me/messages/{message_id}", self.base_url))
                    .bearer_auth(access_token)
                    .query(&[
                        ("format", "metadata"),
                        ("metadataHeaders", "Subject"),
                        ("metadataHeaders", "From"),
                        ("metadataHeaders", "Date"),
                    ])
                    .send()
                    .await
                    .map_err(|e| VendorError::network(VENDOR, e))?;
                read_json(VENDOR, response).await
            })
            .await?;
        Ok(metadata.into_summary())
    }
}
