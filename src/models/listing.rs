// ABOUTME: Marketplace listing records for buying and renting sports equipment
// ABOUTME: Listing type parsing, creation payloads, and query filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use goodrunss_core::errors::AppError;
use goodrunss_core::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// Whether an item is sold outright or rented
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    /// One-off sale
    Sell,
    /// Rental for a period
    Rent,
}

impl ListingType {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sell => "sell",
            Self::Rent => "rent",
        }
    }
}

impl Display for ListingType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sell" => Ok(Self::Sell),
            "rent" => Ok(Self::Rent),
            other => Err(AppError::invalid_input(format!(
                "Invalid listing type '{other}': expected 'sell' or 'rent'"
            ))),
        }
    }
}

/// Equipment listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketplaceListing {
    /// Primary key
    pub id: i64,
    /// Headline
    pub title: String,
    /// Free-form description
    pub description: Option<String>,
    /// Price in dollars (per rental period for rentals)
    pub price: f64,
    /// Sale or rental
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    /// Rental period such as `per day`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_period: Option<String>,
    /// `New`, `Like New`, `Good` or `Fair`
    pub condition: String,
    /// Sport category
    pub category: String,
    /// Selling user
    pub seller_id: i64,
    /// Seller display name
    pub seller_name: Option<String>,
    /// Seller rating out of five
    pub seller_rating: f64,
    /// Postal code of the item
    pub zip_code: String,
    /// Item latitude
    pub latitude: Option<f64>,
    /// Item longitude
    pub longitude: Option<f64>,
    /// Image path or URL
    pub image: Option<String>,
    /// False once the listing has been removed
    pub is_available: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl MarketplaceListing {
    /// Location of the item when both coordinates are known
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

/// Validated fields for a new listing
#[derive(Debug, Clone)]
pub struct NewListing {
    /// Headline
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Price in dollars
    pub price: f64,
    /// Sale or rental
    pub listing_type: ListingType,
    /// Rental period
    pub rental_period: Option<String>,
    /// Condition
    pub condition: String,
    /// Category
    pub category: String,
    /// Selling user
    pub seller_id: i64,
    /// Seller display name
    pub seller_name: String,
    /// Seller rating
    pub seller_rating: f64,
    /// Postal code
    pub zip_code: String,
    /// Item location
    pub location: Coordinates,
    /// Image path or URL
    pub image: String,
}

/// Summary row returned for a seller's own listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SellerListing {
    /// Primary key
    pub id: i64,
    /// Headline
    pub title: String,
    /// Price in dollars
    pub price: f64,
    /// Sale or rental
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    /// Condition
    pub condition: String,
    /// Category
    pub category: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Filters applied to the listing query
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Exact listing type
    pub listing_type: Option<ListingType>,
    /// Exact category
    pub category: Option<String>,
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    /// Leading characters of the zip code
    pub zip_prefix: Option<String>,
}
