// ABOUTME: Users, courts, bookings, games, and payment transactions
// ABOUTME: Records referenced by payments, achievements, maps, calendar and gmail routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered player, trainer, or facility owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Primary key
    pub id: i64,
    /// Unique email address
    pub email: String,
    /// Unique handle
    pub username: String,
    /// Display name
    pub name: String,
    /// Phone number in E.164 form
    pub phone_number: Option<String>,
    /// Whether the account is active
    pub is_active: bool,
    /// Whether the user offers training sessions
    pub is_trainer: bool,
    /// Whether the user owns courts
    pub is_facility_owner: bool,
    /// Home latitude
    pub latitude: Option<f64>,
    /// Home longitude
    pub longitude: Option<f64>,
    /// Street address
    pub address: Option<String>,
    /// Stripe Connect account for trainers
    pub stripe_connect_id: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a user
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    /// Unique email address
    pub email: String,
    /// Unique handle
    pub username: String,
    /// Display name
    pub name: String,
    /// Password hash produced by the account service
    pub hashed_password: String,
    /// Phone number
    pub phone_number: Option<String>,
    /// Trainer flag
    pub is_trainer: bool,
    /// Stripe Connect account
    pub stripe_connect_id: Option<String>,
}

/// Bookable court
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Court {
    /// Primary key
    pub id: i64,
    /// Court name
    pub name: String,
    /// Street address
    pub address: String,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
    /// Hourly rate in dollars
    pub price_per_hour: f64,
    /// Whether the court accepts bookings
    pub available: bool,
    /// Owning user
    pub owner_id: Option<i64>,
}

/// Fields required to create a court
#[derive(Debug, Clone)]
pub struct NewCourt {
    /// Court name
    pub name: String,
    /// Street address
    pub address: String,
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
    /// Hourly rate in dollars
    pub price_per_hour: f64,
    /// Owning user
    pub owner_id: Option<i64>,
}

/// Court booking with a trainer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    /// Primary key
    pub id: i64,
    /// Booking player
    pub user_id: i64,
    /// Booked trainer
    pub trainer_id: i64,
    /// Booked court
    pub court_id: i64,
    /// Session date
    pub date: DateTime<Utc>,
    /// Session start
    pub start_time: DateTime<Utc>,
    /// Session end
    pub end_time: DateTime<Utc>,
    /// Total price in dollars
    pub total_price: f64,
    /// `pending`, `confirmed`, `cancelled` or `completed`
    pub status: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Booking player
    pub user_id: i64,
    /// Booked trainer
    pub trainer_id: i64,
    /// Booked court
    pub court_id: i64,
    /// Session start
    pub start_time: DateTime<Utc>,
    /// Session end
    pub end_time: DateTime<Utc>,
    /// Total price in dollars
    pub total_price: f64,
}

/// Charge recorded after a booking payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Primary key
    pub id: i64,
    /// Paying user
    pub user_id: i64,
    /// Amount charged in dollars
    pub amount: f64,
    /// Platform commission in dollars
    pub platform_fee: f64,
    /// Amount transferred to the trainer in dollars
    pub trainer_amount: f64,
    /// Stripe `PaymentIntent` id
    pub stripe_payment_intent_id: Option<String>,
    /// Paid booking
    pub booking_id: Option<i64>,
    /// `pending`, `completed`, `failed` or `refunded`
    pub status: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Fields recorded for a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Paying user
    pub user_id: i64,
    /// Paid booking
    pub booking_id: Option<i64>,
    /// Amount charged in dollars
    pub amount: f64,
    /// Platform commission in dollars
    pub platform_fee: f64,
    /// Amount transferred to the trainer in dollars
    pub trainer_amount: f64,
    /// Stripe `PaymentIntent` id
    pub stripe_payment_intent_id: Option<String>,
    /// Transaction status
    pub status: String,
}
