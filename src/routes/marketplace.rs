// ABOUTME: Route handlers for the sports equipment marketplace
// ABOUTME: Listing search with distance ranking, creation, seller views, and owner-only removal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! Marketplace routes
//!
//! Listings are ranked by Haversine distance from the caller. Callers that
//! send no location are ranked from the configured default location.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use goodrunss_core::constants::geo::UNKNOWN_DISTANCE;
use goodrunss_core::constants::marketplace::{
    DEFAULT_SELLER_NAME, DEFAULT_SELLER_RATING, PLACEHOLDER_IMAGE, ZIP_PREFIX_LEN,
};
use goodrunss_core::errors::{AppError, AppResult, ErrorCode};
use goodrunss_core::geo::{haversine_miles, round_to, Coordinates};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::models::{ListingFilter, ListingType, MarketplaceListing, NewListing};
use crate::resources::ServerResources;

/// Query parameters for `GET /marketplace/listings`
#[derive(Debug, Default, Deserialize)]
pub struct ListingsQuery {
    /// Zip code; matched on its first three characters
    pub zip_code: Option<String>,
    /// `sell`, `rent` or `all`
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Free-text search over title and description
    pub search: Option<String>,
    /// Caller latitude
    pub user_lat: Option<f64>,
    /// Caller longitude
    pub user_lon: Option<f64>,
}

/// Listing with its distance from the caller
#[derive(Debug, Serialize, Deserialize)]
pub struct RankedListing {
    /// Stored listing
    #[serde(flatten)]
    pub listing: MarketplaceListing,
    /// Human-readable distance, `"{d} miles"` or `"Unknown"`
    pub distance: String,
    /// Distance in miles used for ordering
    pub distance_value: f64,
}

/// Body of `POST /marketplace/listings`
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateListingRequest {
    /// Headline
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Price in dollars
    pub price: f64,
    /// `sell` or `rent`
    #[serde(rename = "type")]
    pub listing_type: String,
    /// Rental period for rentals
    pub rental_period: Option<String>,
    /// Item condition
    pub condition: String,
    /// Sport category
    pub category: String,
    /// Postal code
    pub zip_code: String,
    /// Selling user
    pub seller_id: i64,
    /// Display name used when the seller has no profile
    pub seller_name: Option<String>,
    /// Image path or URL
    pub image: Option<String>,
    /// Item latitude
    pub latitude: Option<f64>,
    /// Item longitude
    pub longitude: Option<f64>,
}

/// Query parameters for `DELETE /marketplace/listings/{id}`
#[derive(Debug, Deserialize)]
pub struct DeleteListingQuery {
    /// Caller; must be the seller
    pub user_id: Option<i64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn require_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::missing_field(field));
    }
    Ok(trimmed.to_owned())
}

impl CreateListingRequest {
    /// Validate the request and fill in defaults
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank required fields, a negative or
    /// non-finite price, or an unknown listing type
    pub fn into_new_listing(
        self,
        seller_name: Option<String>,
        default_location: Coordinates,
    ) -> AppResult<NewListing> {
        let title = require_text(&self.title, "title")?;
        let condition = require_text(&self.condition, "condition")?;
        let category = require_text(&self.category, "category")?;
        let zip_code = require_text(&self.zip_code, "zip_code")?;

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                "price must be a non-negative number",
            ));
        }
        let listing_type: ListingType = self.listing_type.trim().parse()?;

        Ok(NewListing {
            title,
            description: non_blank(self.description),
            price: self.price,
            listing_type,
            rental_period: non_blank(self.rental_period),
            condition,
            category,
            seller_id: self.seller_id,
            seller_name: seller_name
                .or_else(|| non_blank(self.seller_name))
                .unwrap_or_else(|| DEFAULT_SELLER_NAME.to_owned()),
            seller_rating: DEFAULT_SELLER_RATING,
            zip_code,
            location: Coordinates::from_parts(self.latitude, self.longitude)
                .unwrap_or(default_location),
            image: non_blank(self.image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_owned()),
        })
    }
}

/// Attach distances and order listings nearest first
///
/// The sort is stable, so listings at the same distance keep their incoming
/// (newest first) order. Listings without coordinates sort last.
#[must_use]
pub fn rank_by_distance(listings: Vec<MarketplaceListing>, origin: Coordinates) -> Vec<RankedListing> {
    let mut ranked: Vec<RankedListing> = listings
        .into_iter()
        .map(|listing| {
            let (distance, distance_value) = listing.coordinates().map_or_else(
                || ("Unknown".to_owned(), UNKNOWN_DISTANCE),
                |location| {
                    let miles = round_to(haversine_miles(origin, location), 1);
                    (format!("{miles:.1} miles"), miles)
                },
            );
            RankedListing {
                listing,
                distance,
                distance_value,
            }
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_value.total_cmp(&b.distance_value));
    ranked
}

/// Marketplace routes
pub struct MarketplaceRoutes;

impl MarketplaceRoutes {
    /// Create all marketplace routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/marketplace/listings",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/marketplace/listings/:id",
                get(Self::handle_get).delete(Self::handle_delete),
            )
            .route("/marketplace/categories", get(Self::handle_categories))
            .route(
                "/marketplace/user/:user_id/listings",
                get(Self::handle_seller_listings),
            )
            .route("/marketplace/seed", post(Self::handle_seed))
            .with_state(resources)
    }

    /// Handle GET /marketplace/listings
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListingsQuery>,
    ) -> Result<Response, AppError> {
        if resources.config.marketplace.seed_sample_data {
            resources.database.seed_sample_listings().await?;
        }

        let listing_type = match non_blank(query.listing_type).as_deref() {
            None | Some("all") => None,
            Some(other) => match other.parse::<ListingType>() {
                Ok(listing_type) => Some(listing_type),
                // No stored listing can carry an unknown type
                Err(_) => return Ok(Self::listing_page(Vec::new())),
            },
        };

        let filter = ListingFilter {
            listing_type,
            category: non_blank(query.category),
            search: non_blank(query.search),
            zip_prefix: non_blank(query.zip_code)
                .map(|zip| zip.chars().take(ZIP_PREFIX_LEN).collect()),
        };

        let origin = Coordinates::from_parts(query.user_lat, query.user_lon)
            .unwrap_or(resources.config.marketplace.default_location);

        let listings = resources.database.list_listings(&filter).await?;
        Ok(Self::listing_page(rank_by_distance(listings, origin)))
    }

    fn listing_page(listings: Vec<RankedListing>) -> Response {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": listings.len(),
                "listings": listings,
                "source": "database",
            })),
        )
            .into_response()
    }

    /// Handle GET /marketplace/listings/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(listing_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let listing = resources
            .database
            .get_listing(listing_id)
            .await?
            .ok_or_else(|| AppError::not_found("Listing").with_resource_id(listing_id.to_string()))?;

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "listing": listing })),
        )
            .into_response())
    }

    /// Handle POST /marketplace/listings
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<CreateListingRequest>,
    ) -> Result<Response, AppError> {
        let seller_name = resources
            .database
            .get_user(request.seller_id)
            .await?
            .map(|user| user.name);

        let listing =
            request.into_new_listing(seller_name, resources.config.marketplace.default_location)?;
        let listing_id = resources.database.create_listing(&listing).await?;

        info!(listing_id, seller_id = listing.seller_id, "Marketplace listing created");

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Listing created successfully",
                "listing_id": listing_id,
            })),
        )
            .into_response())
    }

    /// Handle GET /marketplace/categories
    async fn handle_categories(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let categories = resources.database.list_listing_categories().await?;
        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "categories": categories })),
        )
            .into_response())
    }

    /// Handle GET /marketplace/user/:user_id/listings
    async fn handle_seller_listings(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let listings = resources.database.list_seller_listings(user_id).await?;
        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "count": listings.len(),
                "listings": listings,
            })),
        )
            .into_response())
    }

    /// Handle DELETE /marketplace/listings/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(listing_id): Path<i64>,
        Query(query): Query<DeleteListingQuery>,
    ) -> Result<Response, AppError> {
        let user_id = query.user_id.ok_or_else(|| AppError::missing_field("user_id"))?;

        let listing = resources
            .database
            .get_listing(listing_id)
            .await?
            .ok_or_else(|| AppError::not_found("Listing").with_resource_id(listing_id.to_string()))?;

        if listing.seller_id != user_id {
            return Err(AppError::permission_denied(
                "Only the seller can delete this listing",
            ));
        }

        resources.database.deactivate_listing(listing_id).await?;
        info!(listing_id, user_id, "Marketplace listing removed");

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Listing deleted successfully" })),
        )
            .into_response())
    }

    /// Handle POST /marketplace/seed
    async fn handle_seed(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let inserted = resources.database.seed_sample_listings().await?;
        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "seeded": inserted })),
        )
            .into_response())
    }
}
