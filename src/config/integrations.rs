// ABOUTME: Vendor credential configuration and integration status reporting
// ABOUTME: Declares which environment variables each vendor integration requires
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! Vendor credentials.
//!
//! Each integration declares the environment variables it needs in
//! [`VENDORS`]. An integration is enabled exactly when every one of its
//! variables is present and non-blank; integrations with no variables are
//! always enabled.

use std::collections::{BTreeMap, HashMap};
use std::env;

use goodrunss_core::constants::vendors;
use goodrunss_vendors::google::GoogleOAuthConfig;
use goodrunss_vendors::twilio::TwilioCredentials;
use serde::Serialize;

/// Stripe platform secret key
pub const STRIPE_SECRET_KEY: &str = "STRIPE_SECRET_KEY";
/// Google OAuth client id shared by Gmail and Calendar
pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
/// Google OAuth client secret shared by Gmail and Calendar
pub const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
/// Twilio account SID
pub const TWILIO_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
/// Twilio auth token
pub const TWILIO_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
/// Twilio sender number
pub const TWILIO_PHONE_NUMBER: &str = "TWILIO_PHONE_NUMBER";
/// Instagram app id
pub const INSTAGRAM_APP_ID: &str = "INSTAGRAM_APP_ID";
/// Google Maps server key
pub const GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
/// Zoom API key
pub const ZOOM_API_KEY: &str = "ZOOM_API_KEY";

/// How a vendor's capabilities are labelled in the status report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityLabel {
    /// Reported under `features`
    Features,
    /// Reported under `supported_devices`
    SupportedDevices,
}

/// Static description of one vendor integration
#[derive(Debug, Clone, Copy)]
pub struct VendorSpec {
    /// Key used in the status report
    pub key: &'static str,
    /// Environment variables that must all be set
    pub required_env: &'static [&'static str],
    /// Capabilities advertised in the status report
    pub capabilities: &'static [&'static str],
    /// Label for `capabilities`
    pub label: CapabilityLabel,
}

/// Every integration, in startup log order
pub const VENDORS: &[VendorSpec] = &[
    VendorSpec {
        key: vendors::STRIPE,
        required_env: &[STRIPE_SECRET_KEY],
        capabilities: &["payments", "connect", "instant_payouts"],
        label: CapabilityLabel::Features,
    },
    VendorSpec {
        key: vendors::ACHIEVEMENTS,
        required_env: &[],
        capabilities: &["viral_moments", "social_sharing", "leaderboards"],
        label: CapabilityLabel::Features,
    },
    VendorSpec {
        key: vendors::WEARABLES,
        required_env: &[],
        capabilities: &["apple_watch", "whoop", "fitbit", "garmin"],
        label: CapabilityLabel::SupportedDevices,
    },
    VendorSpec {
        key: vendors::GMAIL,
        required_env: &[GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET],
        capabilities: &["send_email", "read_email", "booking_confirmation"],
        label: CapabilityLabel::Features,
    },
    VendorSpec {
        key: vendors::GOOGLE_CALENDAR,
        required_env: &[GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET],
        capabilities: &["create_events", "sync_bookings", "get_events"],
        label: CapabilityLabel::Features,
    },
    VendorSpec {
        key: vendors::TWILIO_SMS,
        required_env: &[TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, TWILIO_PHONE_NUMBER],
        capabilities: &["send_sms", "2fa", "booking_reminders"],
        label: CapabilityLabel::Features,
    },
    VendorSpec {
        key: vendors::INSTAGRAM,
        required_env: &[INSTAGRAM_APP_ID],
        capabilities: &["post_achievements", "social_sharing"],
        label: CapabilityLabel::Features,
    },
    VendorSpec {
        key: vendors::GOOGLE_MAPS,
        required_env: &[GOOGLE_MAPS_API_KEY],
        capabilities: &["directions", "nearby_courts", "geocoding"],
        label: CapabilityLabel::Features,
    },
    VendorSpec {
        key: vendors::ZOOM,
        required_env: &[ZOOM_API_KEY],
        capabilities: &["virtual_sessions", "meeting_creation"],
        label: CapabilityLabel::Features,
    },
];

/// Status of one integration as reported by `/integrations/status`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VendorStatus {
    /// Whether all required credentials are configured
    pub enabled: bool,
    /// Advertised features
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<&'static str>>,
    /// Supported wearable devices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_devices: Option<Vec<&'static str>>,
}

/// Vendor credentials read from the environment
#[derive(Debug, Clone, Default)]
pub struct IntegrationsConfig {
    values: HashMap<&'static str, String>,
}

impl IntegrationsConfig {
    /// Build from an arbitrary key lookup; blank values count as absent
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = VENDORS
            .iter()
            .flat_map(|spec| spec.required_env.iter().copied())
            .filter_map(|key| {
                lookup(key)
                    .map(|value| value.trim().to_owned())
                    .filter(|value| !value.is_empty())
                    .map(|value| (key, value))
            })
            .collect();
        Self { values }
    }

    /// Build from process environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether every required variable of `spec` is set
    #[must_use]
    pub fn is_enabled(&self, spec: &VendorSpec) -> bool {
        spec.required_env.iter().all(|key| self.get(key).is_some())
    }

    /// Whether the integration with the given status key is enabled
    #[must_use]
    pub fn is_vendor_enabled(&self, vendor_key: &str) -> bool {
        VENDORS
            .iter()
            .find(|spec| spec.key == vendor_key)
            .is_some_and(|spec| self.is_enabled(spec))
    }

    /// Stripe secret key
    #[must_use]
    pub fn stripe_secret_key(&self) -> Option<&str> {
        self.get(STRIPE_SECRET_KEY)
    }

    /// Google OAuth client when both id and secret are set
    #[must_use]
    pub fn google_oauth(&self) -> Option<GoogleOAuthConfig> {
        Some(GoogleOAuthConfig {
            client_id: self.get(GOOGLE_CLIENT_ID)?.to_owned(),
            client_secret: self.get(GOOGLE_CLIENT_SECRET)?.to_owned(),
        })
    }

    /// Twilio credentials when all three values are set
    #[must_use]
    pub fn twilio(&self) -> Option<TwilioCredentials> {
        Some(TwilioCredentials {
            account_sid: self.get(TWILIO_ACCOUNT_SID)?.to_owned(),
            auth_token: self.get(TWILIO_AUTH_TOKEN)?.to_owned(),
            from_number: self.get(TWILIO_PHONE_NUMBER)?.to_owned(),
        })
    }

    /// Google Maps server key
    #[must_use]
    pub fn google_maps_api_key(&self) -> Option<&str> {
        self.get(GOOGLE_MAPS_API_KEY)
    }

    /// Status of every integration keyed by vendor, keys in alphabetical order
    #[must_use]
    pub fn status_report(&self) -> BTreeMap<&'static str, VendorStatus> {
        VENDORS
            .iter()
            .map(|spec| {
                let capabilities = spec.capabilities.to_vec();
                let (features, supported_devices) = match spec.label {
                    CapabilityLabel::Features => (Some(capabilities), None),
                    CapabilityLabel::SupportedDevices => (None, Some(capabilities)),
                };
                (
                    spec.key,
                    VendorStatus {
                        enabled: self.is_enabled(spec),
                        features,
                        supported_devices,
                    },
                )
            })
            .collect()
    }

    /// Names of enabled integrations, for startup logging
    #[must_use]
    pub fn enabled_vendors(&self) -> Vec<&'static str> {
        VENDORS
            .iter()
            .filter(|spec| self.is_enabled(spec))
            .map(|spec| spec.key)
            .collect()
    }
}
