// ABOUTME: Google API clients sharing one OAuth 2.0 credential flow
// ABOUTME: Exposes OAuth token handling plus Gmail and Calendar REST clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

/// Google Calendar v3 client
pub mod calendar;
/// Gmail v1 client
pub mod gmail;
/// OAuth 2.0 authorization and token exchange
pub mod oauth;

pub use calendar::{CalendarClient, CalendarEvent, EventTime, NewCalendarEvent, CALENDAR_SCOPES};
pub use gmail::{EmailSummary, GmailClient, SentMessage, GMAIL_SCOPES};
pub use oauth::{GoogleCredentials, GoogleOAuthClient, GoogleOAuthConfig, GoogleTokens};
