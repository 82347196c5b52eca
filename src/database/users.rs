// ABOUTME: User, court, booking, and game database operations
// ABOUTME: Core records shared by payments, achievements, maps, calendar and gmail features
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, Utc};
use goodrunss_core::errors::AppResult;
use sqlx::{sqlite::SqliteRow, Row};

use super::Database;
use crate::models::{Booking, Court, NewBooking, NewCourt, NewUser, User};

impl Database {
    /// Create users, courts, bookings and games tables
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL,
                username TEXT UNIQUE NOT NULL,
                hashed_password TEXT NOT NULL,
                name TEXT NOT NULL,
                phone_number TEXT,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                is_trainer BOOLEAN NOT NULL DEFAULT 0,
                is_facility_owner BOOLEAN NOT NULL DEFAULT 0,
                latitude REAL,
                longitude REAL,
                address TEXT,
                stripe_connect_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS courts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                price_per_hour REAL NOT NULL,
                available BOOLEAN NOT NULL DEFAULT 1,
                owner_id INTEGER REFERENCES users(id),
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                trainer_id INTEGER NOT NULL REFERENCES users(id),
                court_id INTEGER NOT NULL REFERENCES courts(id),
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                total_price REAL NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                court_id INTEGER REFERENCES courts(id),
                score INTEGER NOT NULL,
                duration_minutes INTEGER,
                game_type TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_user ON bookings(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_trainer ON bookings(trainer_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_games_user ON games(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Register a user and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the email or username is taken or the insert fails
    pub async fn create_user(&self, user: &NewUser) -> AppResult<i64> {
        let now = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO users (email, username, hashed_password, name, phone_number,
                               is_trainer, stripe_connect_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.hashed_password)
        .bind(&user.name)
        .bind(&user.phone_number)
        .bind(user.is_trainer)
        .bind(&user.stripe_connect_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Add a court and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_court(&self, court: &NewCourt) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO courts (name, address, latitude, longitude, price_per_hour, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&court.name)
        .bind(&court.address)
        .bind(court.latitude)
        .bind(court.longitude)
        .bind(court.price_per_hour)
        .bind(court.owner_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get a court by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_court(&self, court_id: i64) -> AppResult<Option<Court>> {
        let row = sqlx::query("SELECT * FROM courts WHERE id = $1")
            .bind(court_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_court).transpose()
    }

    /// All courts currently accepting bookings
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_available_courts(&self) -> AppResult<Vec<Court>> {
        let rows = sqlx::query("SELECT * FROM courts WHERE available = 1 ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_court).collect()
    }

    /// Book a court with a trainer and return the booking id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_booking(&self, booking: &NewBooking) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO bookings (user_id, trainer_id, court_id, date, start_time, end_time,
                                  total_price, status, created_at)
            VALUES ($1, $2, $3, $4, $4, $5, $6, 'pending', $7)
            ",
        )
        .bind(booking.user_id)
        .bind(booking.trainer_id)
        .bind(booking.court_id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.total_price)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get a booking by id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_booking(&self, booking_id: i64) -> AppResult<Option<Booking>> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_booking).transpose()
    }

    /// Number of bookings made by a user, optionally only those created after `since`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_user_bookings(
        &self,
        user_id: i64,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<i64> {
        let count: i64 = match since {
            Some(since) => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM bookings WHERE user_id = $1 AND created_at >= $2",
                )
                .bind(user_id)
                .bind(since)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    /// Record a game result and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn record_game(
        &self,
        user_id: i64,
        court_id: Option<i64>,
        score: i64,
        game_type: Option<&str>,
    ) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO games (user_id, court_id, score, game_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(user_id)
        .bind(court_id)
        .bind(score)
        .bind(game_type)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Number of games a user finished with exactly `score`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_games_with_score(&self, user_id: i64, score: i64) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM games WHERE user_id = $1 AND score = $2")
                .bind(user_id)
                .bind(score)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        phone_number: row.try_get("phone_number")?,
        is_active: row.try_get("is_active")?,
        is_trainer: row.try_get("is_trainer")?,
        is_facility_owner: row.try_get("is_facility_owner")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        address: row.try_get("address")?,
        stripe_connect_id: row.try_get("stripe_connect_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_court(row: &SqliteRow) -> AppResult<Court> {
    Ok(Court {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        price_per_hour: row.try_get("price_per_hour")?,
        available: row.try_get("available")?,
        owner_id: row.try_get("owner_id")?,
    })
}

fn row_to_booking(row: &SqliteRow) -> AppResult<Booking> {
    Ok(Booking {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        trainer_id: row.try_get("trainer_id")?,
        court_id: row.try_get("court_id")?,
        date: row.try_get("date")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        total_price: row.try_get("total_price")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{create_test_db, new_user, seed_booking};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_create_and_get_user() {
        let db = create_test_db().await;
        let id = db.create_user(&new_user("alex")).await.unwrap();

        let user = db.get_user(id).await.unwrap().unwrap();
        assert_eq!(user.username, "alex");
        assert!(user.is_active);
        assert!(!user.is_trainer);
        assert!(db.get_user(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = create_test_db().await;
        db.create_user(&new_user("sam")).await.unwrap();
        assert!(db.create_user(&new_user("sam")).await.is_err());
    }

    #[tokio::test]
    async fn test_booking_counts() {
        let db = create_test_db().await;
        let (player, trainer, booking_id) = seed_booking(&db).await;

        let booking = db.get_booking(booking_id).await.unwrap().unwrap();
        assert_eq!(booking.user_id, player);
        assert_eq!(booking.trainer_id, trainer);
        assert_eq!(booking.status, "pending");

        assert_eq!(db.count_user_bookings(player, None).await.unwrap(), 1);
        let last_week = Utc::now() - Duration::days(7);
        assert_eq!(db.count_user_bookings(player, Some(last_week)).await.unwrap(), 1);
        let tomorrow = Utc::now() + Duration::days(1);
        assert_eq!(db.count_user_bookings(player, Some(tomorrow)).await.unwrap(), 0);
        assert_eq!(db.count_user_bookings(trainer, None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_games_with_score() {
        let db = create_test_db().await;
        let user = db.create_user(&new_user("kim")).await.unwrap();
        db.record_game(user, None, 100, Some("pickup")).await.unwrap();
        db.record_game(user, None, 87, None).await.unwrap();

        assert_eq!(db.count_games_with_score(user, 100).await.unwrap(), 1);
    }
}
