// ABOUTME: Shared resource container injected into every route handler
// ABOUTME: Holds the database, configuration, and one client per vendor integration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! # Server Resources
//!
//! Vendor clients are built once at startup. Clients for vendors whose
//! credentials are missing are left out, and the accessors turn that into a
//! `CONFIG_MISSING` error for the route that needed them.

use std::sync::Arc;

use goodrunss_core::errors::{AppError, AppResult};
use goodrunss_vendors::google::{CalendarClient, GmailClient, GoogleOAuthClient};
use goodrunss_vendors::instagram::InstagramClient;
use goodrunss_vendors::maps::MapsClient;
use goodrunss_vendors::stripe::StripeClient;
use goodrunss_vendors::twilio::TwilioClient;
use goodrunss_vendors::whoop::WhoopClient;
use goodrunss_vendors::zoom::ZoomClient;

use crate::config::{IntegrationsConfig, ServerConfig};
use crate::database::Database;

/// Vendor API clients
///
/// Stripe, Twilio, Google OAuth and Maps authenticate with server credentials
/// and are optional. The remaining clients act with per-user tokens and are
/// always available.
#[derive(Debug)]
pub struct VendorClients {
    /// Stripe payments
    pub stripe: Option<StripeClient>,
    /// Twilio SMS
    pub twilio: Option<TwilioClient>,
    /// Google OAuth for Gmail and Calendar
    pub google_oauth: Option<GoogleOAuthClient>,
    /// Google Maps
    pub maps: Option<MapsClient>,
    /// Gmail API
    pub gmail: GmailClient,
    /// Google Calendar API
    pub calendar: CalendarClient,
    /// Instagram Graph API
    pub instagram: InstagramClient,
    /// Zoom API
    pub zoom: ZoomClient,
    /// WHOOP developer API
    pub whoop: WhoopClient,
}

impl VendorClients {
    /// Build clients for every vendor whose credentials are configured
    #[must_use]
    pub fn from_config(integrations: &IntegrationsConfig) -> Self {
        Self {
            stripe: integrations.stripe_secret_key().map(StripeClient::new),
            twilio: integrations.twilio().map(TwilioClient::new),
            google_oauth: integrations.google_oauth().map(GoogleOAuthClient::new),
            maps: integrations.google_maps_api_key().map(MapsClient::new),
            gmail: GmailClient::new(),
            calendar: CalendarClient::new(),
            instagram: InstagramClient::new(),
            zoom: ZoomClient::new(),
            whoop: WhoopClient::new(),
        }
    }
}

/// Centralized resource container for dependency injection
#[derive(Clone, Debug)]
pub struct ServerResources {
    /// Database handle
    pub database: Arc<Database>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Vendor clients
    pub vendors: Arc<VendorClients>,
}

impl ServerResources {
    /// Create resources with vendor clients derived from the configuration
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let vendors = VendorClients::from_config(&config.integrations);
        Self {
            database: Arc::new(database),
            config: Arc::new(config),
            vendors: Arc::new(vendors),
        }
    }

    /// Replace the vendor clients, typically to point them at mock servers
    #[must_use]
    pub fn with_vendors(mut self, vendors: VendorClients) -> Self {
        self.vendors = Arc::new(vendors);
        self
    }

    /// Stripe client
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_MISSING` when `STRIPE_SECRET_KEY` is not set
    pub fn stripe(&self) -> AppResult<&StripeClient> {
        self.vendors
            .stripe
            .as_ref()
            .ok_or_else(|| AppError::config_missing("Stripe"))
    }

    /// Twilio client
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_MISSING` when any Twilio variable is not set
    pub fn twilio(&self) -> AppResult<&TwilioClient> {
        self.vendors
            .twilio
            .as_ref()
            .ok_or_else(|| AppError::config_missing("Twilio"))
    }

    /// Google OAuth client
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_MISSING` when the Google client id or secret is not set
    pub fn google_oauth(&self) -> AppResult<&GoogleOAuthClient> {
        self.vendors
            .google_oauth
            .as_ref()
            .ok_or_else(|| AppError::config_missing("Google OAuth"))
    }

    /// Google Maps client
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_MISSING` when `GOOGLE_MAPS_API_KEY` is not set
    pub fn maps(&self) -> AppResult<&MapsClient> {
        self.vendors
            .maps
            .as_ref()
            .ok_or_else(|| AppError::config_missing("Google Maps"))
    }

    /// Absolute redirect URI for an OAuth callback path
    #[must_use]
    pub fn redirect_uri(&self, path: &str) -> String {
        format!("{}{path}", self.config.public_base_url)
    }
}
