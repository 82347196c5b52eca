// ABOUTME: Domain models persisted by the GoodRunss server
// ABOUTME: Re-exports users, marketplace, achievements, wearables, and integration records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! # Data Models
//!
//! Plain records mapped from `SQLite` rows. Every model serializes to the JSON
//! shape returned by the routes, so handlers can hand rows straight to `Json`.

mod achievement;
mod integration;
mod listing;
mod user;
mod wearable;

pub use achievement::{AchievementDefinition, LeaderboardEntry, UnlockedAchievement};
pub use integration::{
    IntegrationProvider, NewVirtualSession, SmsLog, SocialIntegration, StoredGoogleIntegration,
    VirtualSession, ZoomIntegration,
};
pub use listing::{ListingFilter, ListingType, MarketplaceListing, NewListing, SellerListing};
pub use user::{
    Booking, Court, NewBooking, NewCourt, NewTransaction, NewUser, Transaction, User,
};
pub use wearable::{DeviceType, WearableConnection, WearableSample};
