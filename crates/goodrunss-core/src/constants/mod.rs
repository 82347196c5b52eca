// ABOUTME: Application constants organized by domain
// ABOUTME: Commission rates, two-factor settings, default locations, and vendor identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! Application-wide constants grouped by the feature that owns them.

/// Service identity reported by the root and health endpoints
pub mod service {
    /// Human-readable service name
    pub const SERVICE_NAME: &str = "goodrunss-server";

    /// Banner message returned by `GET /`
    pub const API_BANNER: &str = "GoodRunss Backend API v2.0";

    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8001;
}

/// Payment split between the platform and trainers
pub mod payments {
    /// Platform commission taken from every booking payment
    pub const PLATFORM_COMMISSION_RATE: f64 = 0.05;

    /// Currency used for all charges and balances
    pub const CURRENCY: &str = "usd";

    /// Transaction status recorded after a successful charge
    pub const STATUS_COMPLETED: &str = "completed";
}

/// Achievement scoring
pub mod achievements {
    /// Bonus points granted for sharing an achievement
    pub const SHARE_BONUS_POINTS: i64 = 5;

    /// Bookings within the streak window required for the streak achievement
    pub const STREAK_BOOKINGS_REQUIRED: i64 = 7;

    /// Length of the streak window in days
    pub const STREAK_WINDOW_DAYS: i64 = 7;

    /// Game score that counts as a perfect game
    pub const PERFECT_GAME_SCORE: i64 = 100;

    /// Shared achievements required for the social sharer achievement
    pub const SHARES_FOR_SOCIAL_SHARER: i64 = 5;

    /// Default leaderboard size
    pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;
}

/// SMS two-factor verification
pub mod two_factor {
    /// Number of digits in a verification code
    pub const CODE_LENGTH: usize = 6;

    /// Minutes until a verification code expires
    pub const CODE_TTL_MINUTES: i64 = 5;
}

/// Phone number normalisation
pub mod phone {
    /// Country code assumed for bare ten-digit numbers
    pub const DEFAULT_COUNTRY_CODE: &str = "1";

    /// Fewest digits accepted after the `+`
    pub const MIN_DIGITS: usize = 8;

    /// Most digits an E.164 number may carry
    pub const MAX_DIGITS: usize = 15;
}

/// Geographic defaults
pub mod geo {
    /// Mean Earth radius in miles
    pub const EARTH_RADIUS_MILES: f64 = 3959.0;

    /// Mean Earth radius in kilometres
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Default user latitude (Midtown Manhattan)
    pub const DEFAULT_LATITUDE: f64 = 40.7489;

    /// Default user longitude (Midtown Manhattan)
    pub const DEFAULT_LONGITUDE: f64 = -73.9680;

    /// Sort key for listings without coordinates
    pub const UNKNOWN_DISTANCE: f64 = 9999.0;

    /// Default search radius for nearby courts
    pub const DEFAULT_COURT_RADIUS_KM: f64 = 10.0;

    /// Default number of nearby courts returned
    pub const DEFAULT_COURT_LIMIT: usize = 20;
}

/// Marketplace defaults
pub mod marketplace {
    /// Image stored when a listing is created without one
    pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";

    /// Seller name stored when the seller has no profile name
    pub const DEFAULT_SELLER_NAME: &str = "User";

    /// Rating assigned to new sellers
    pub const DEFAULT_SELLER_RATING: f64 = 5.0;

    /// Number of leading zip code characters compared by the zip filter
    pub const ZIP_PREFIX_LEN: usize = 3;
}

/// Scheduling defaults shared by calendar and video integrations
pub mod scheduling {
    /// Time zone used for calendar events and meetings
    pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

    /// Email reminder lead time in minutes (one day)
    pub const EMAIL_REMINDER_MINUTES: u32 = 24 * 60;

    /// Popup reminder lead time in minutes
    pub const POPUP_REMINDER_MINUTES: u32 = 10;

    /// Default number of days of upcoming calendar events
    pub const DEFAULT_DAYS_AHEAD: i64 = 7;

    /// Default number of days of wearable history
    pub const DEFAULT_WEARABLE_DAYS: i64 = 7;
}

/// Vendor identifiers used as keys in status reports and persisted rows
pub mod vendors {
    /// Stripe payments
    pub const STRIPE: &str = "stripe";
    /// Achievements (no external credentials)
    pub const ACHIEVEMENTS: &str = "achievements";
    /// Wearable devices
    pub const WEARABLES: &str = "wearables";
    /// Gmail
    pub const GMAIL: &str = "gmail";
    /// Google Calendar
    pub const GOOGLE_CALENDAR: &str = "google_calendar";
    /// Twilio SMS
    pub const TWILIO_SMS: &str = "twilio_sms";
    /// Instagram Graph
    pub const INSTAGRAM: &str = "instagram";
    /// Google Maps
    pub const GOOGLE_MAPS: &str = "google_maps";
    /// Zoom
    pub const ZOOM: &str = "zoom";
}
