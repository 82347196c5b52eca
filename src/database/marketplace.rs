// ABOUTME: Marketplace listing database operations
// ABOUTME: Filtered listing queries, seller views, soft delete, and sample data seeding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, Duration, Utc};
use goodrunss_core::errors::AppResult;
use goodrunss_core::geo::Coordinates;
use sqlx::{
    sqlite::{SqliteConnection, SqliteRow},
    Row,
};
use tracing::info;

use super::Database;
use crate::models::{ListingFilter, ListingType, MarketplaceListing, NewListing, SellerListing};

/// Account credited with the sample catalogue
const SAMPLE_SELLER_ID: i64 = 1;

impl Database {
    /// Create the `marketplace_listings` table
    ///
    /// Sellers are not constrained to local users so listings can be imported
    /// for accounts managed elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_marketplace(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS marketplace_listings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                price REAL NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('sell', 'rent')),
                rental_period TEXT,
                condition TEXT NOT NULL,
                category TEXT NOT NULL,
                seller_id INTEGER NOT NULL,
                seller_name TEXT,
                seller_rating REAL NOT NULL DEFAULT 5.0,
                zip_code TEXT NOT NULL,
                latitude REAL,
                longitude REAL,
                image TEXT,
                is_available BOOLEAN NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_listings_available ON marketplace_listings(is_available)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_listings_category ON marketplace_listings(category)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_listings_seller ON marketplace_listings(seller_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a listing and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_listing(&self, listing: &NewListing) -> AppResult<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_listing(&mut conn, listing, Utc::now()).await
    }

    /// Get a listing by id, including removed listings
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value is malformed
    pub async fn get_listing(&self, listing_id: i64) -> AppResult<Option<MarketplaceListing>> {
        let row = sqlx::query("SELECT * FROM marketplace_listings WHERE id = $1")
            .bind(listing_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_listing).transpose()
    }

    /// Available listings matching `filter`, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value is malformed
    pub async fn list_listings(&self, filter: &ListingFilter) -> AppResult<Vec<MarketplaceListing>> {
        let mut query = String::from("SELECT * FROM marketplace_listings WHERE is_available = 1");
        let mut bind_values = vec![];

        if let Some(listing_type) = filter.listing_type {
            query.push_str(" AND type = ?");
            bind_values.push(listing_type.as_str().to_owned());
        }

        if let Some(category) = &filter.category {
            query.push_str(" AND category = ?");
            bind_values.push(category.clone());
        }

        if let Some(search) = &filter.search {
            query.push_str(
                " AND (instr(lower(title), ?) > 0 OR instr(lower(coalesce(description, '')), ?) > 0)",
            );
            let needle = search.to_lowercase();
            bind_values.push(needle.clone());
            bind_values.push(needle);
        }

        if let Some(prefix) = &filter.zip_prefix {
            query.push_str(" AND substr(zip_code, 1, length(?)) = ?");
            bind_values.push(prefix.clone());
            bind_values.push(prefix.clone());
        }

        query.push_str(" ORDER BY created_at DESC, id DESC");

        let mut sql_query = sqlx::query(&query);
        for value in bind_values {
            sql_query = sql_query.bind(value);
        }

        let rows = sql_query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_listing).collect()
    }

    /// Distinct categories across all listings, removed ones included, alphabetical
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_listing_categories(&self) -> AppResult<Vec<String>> {
        let categories = sqlx::query_scalar(
            "SELECT DISTINCT category FROM marketplace_listings ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Available listings posted by one seller, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored value is malformed
    pub async fn list_seller_listings(&self, seller_id: i64) -> AppResult<Vec<SellerListing>> {
        let rows = sqlx::query(
            r"
            SELECT id, title, price, type, condition, category, created_at
            FROM marketplace_listings
            WHERE seller_id = $1 AND is_available = 1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_seller_listing).collect()
    }

    /// Mark a listing unavailable. Returns false when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn deactivate_listing(&self, listing_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE marketplace_listings SET is_available = 0, updated_at = $2 WHERE id = $1",
        )
        .bind(listing_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Total number of listing rows, removed listings included
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_all_listings(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM marketplace_listings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Insert the sample catalogue when the table has never held a listing
    ///
    /// Returns the number of listings inserted. The check and the inserts run
    /// in one `BEGIN IMMEDIATE` transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if counting or inserting fails
    pub async fn seed_sample_listings(&self) -> AppResult<usize> {
        // The write lock is taken before counting so concurrent callers seed once
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM marketplace_listings")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tx.commit().await?;
            return Ok(0);
        }

        let samples = sample_listings();
        let now = Utc::now();
        // Stagger creation times so the catalogue keeps a stable order
        for (offset, listing) in (0_i64..).zip(samples.iter()) {
            insert_listing(&mut tx, listing, now - Duration::minutes(offset)).await?;
        }
        tx.commit().await?;

        info!(count = samples.len(), "Seeded sample marketplace listings");
        Ok(samples.len())
    }
}

async fn insert_listing(
    conn: &mut SqliteConnection,
    listing: &NewListing,
    created_at: DateTime<Utc>,
) -> AppResult<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO marketplace_listings (
            title, description, price, type, rental_period, condition, category,
            seller_id, seller_name, seller_rating, zip_code, latitude, longitude,
            image, is_available, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, 1, $15, $15)
        ",
    )
    .bind(&listing.title)
    .bind(&listing.description)
    .bind(listing.price)
    .bind(listing.listing_type.as_str())
    .bind(&listing.rental_period)
    .bind(&listing.condition)
    .bind(&listing.category)
    .bind(listing.seller_id)
    .bind(&listing.seller_name)
    .bind(listing.seller_rating)
    .bind(&listing.zip_code)
    .bind(listing.location.latitude)
    .bind(listing.location.longitude)
    .bind(&listing.image)
    .bind(created_at)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Starter catalogue shown on a fresh install
#[must_use]
pub fn sample_listings() -> Vec<NewListing> {
    let sample = |title: &str,
                  description: &str,
                  price: f64,
                  listing_type: ListingType,
                  rental_period: Option<&str>,
                  condition: &str,
                  category: &str,
                  seller: (&str, f64),
                  zip_code: &str,
                  location: (f64, f64),
                  image: &str| NewListing {
        title: title.to_owned(),
        description: Some(description.to_owned()),
        price,
        listing_type,
        rental_period: rental_period.map(str::to_owned),
        condition: condition.to_owned(),
        category: category.to_owned(),
        seller_id: SAMPLE_SELLER_ID,
        seller_name: seller.0.to_owned(),
        seller_rating: seller.1,
        zip_code: zip_code.to_owned(),
        location: Coordinates::new(location.0, location.1),
        image: image.to_owned(),
    };

    vec![
        sample(
            "Wilson Basketball - Like New",
            "Official size basketball, barely used",
            25.0,
            ListingType::Sell,
            None,
            "Like New",
            "basketball",
            ("Mike Johnson", 4.8),
            "10001",
            (40.7506, -73.9971),
            "/basketball-action.png",
        ),
        sample(
            "Tennis Racket - Wilson Pro Staff",
            "Professional tennis racket",
            15.0,
            ListingType::Rent,
            Some("per day"),
            "Good",
            "tennis",
            ("Sarah Chen", 4.9),
            "10001",
            (40.7489, -73.9680),
            "/tennis-racket.png",
        ),
        sample(
            "Pickleball Paddle Set",
            "Two paddles and balls",
            40.0,
            ListingType::Sell,
            None,
            "Excellent",
            "pickleball",
            ("David Lee", 4.7),
            "10002",
            (40.7157, -73.9866),
            "/pickleball-paddle.jpg",
        ),
        sample(
            "Golf Club Set - Callaway",
            "Complete set with bag",
            50.0,
            ListingType::Rent,
            Some("per week"),
            "Good",
            "golf",
            ("Emma Wilson", 4.6),
            "10003",
            (40.7316, -73.9894),
            "/assorted-golf-clubs.png",
        ),
        sample(
            "Basketball Shoes - Nike Size 10",
            "High-top shoes, worn twice",
            60.0,
            ListingType::Sell,
            None,
            "Like New",
            "basketball",
            ("James Brown", 4.9),
            "10001",
            (40.7580, -73.9855),
            "/athletic-basketball-shoes.png",
        ),
        sample(
            "Volleyball Net & Ball",
            "Portable net with ball",
            20.0,
            ListingType::Rent,
            Some("per day"),
            "Good",
            "volleyball",
            ("Lisa Martinez", 4.8),
            "10002",
            (40.7209, -73.9876),
            "/volleyball-net.jpg",
        ),
    ]
}

fn row_to_seller_listing(row: &SqliteRow) -> AppResult<SellerListing> {
    let listing_type: String = row.try_get("type")?;
    Ok(SellerListing {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        price: row.try_get("price")?,
        listing_type: listing_type.parse()?,
        condition: row.try_get("condition")?,
        category: row.try_get("category")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_listing(row: &SqliteRow) -> AppResult<MarketplaceListing> {
    let listing_type: String = row.try_get("type")?;
    Ok(MarketplaceListing {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        listing_type: listing_type.parse()?,
        rental_period: row.try_get("rental_period")?,
        condition: row.try_get("condition")?,
        category: row.try_get("category")?,
        seller_id: row.try_get("seller_id")?,
        seller_name: row.try_get("seller_name")?,
        seller_rating: row.try_get("seller_rating")?,
        zip_code: row.try_get("zip_code")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        image: row.try_get("image")?,
        is_available: row.try_get("is_available")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
