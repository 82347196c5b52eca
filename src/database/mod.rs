// ABOUTME: SQLite storage for users, marketplace listings, payments, and vendor integrations
// ABOUTME: Owns the connection pool and runs idempotent schema migrations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

//! # Database Management
//!
//! A single [`Database`] wraps the `SQLite` pool. Operations are grouped by
//! feature in submodules that each add an `impl Database` block and own the
//! `CREATE TABLE IF NOT EXISTS` statements for their tables.

mod achievements;
mod integrations;
mod marketplace;
mod payments;
mod sms;
mod users;
mod wearables;

use std::str::FromStr;

use goodrunss_core::errors::AppResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Database manager for all persisted records
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or a
    /// migration statement fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let db = Self::connect(database_url).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Open the database without touching the schema
    ///
    /// The file is created when it does not exist. In-memory databases are
    /// limited to one long-lived connection so every query sees the same data.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the connection fails
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;
        debug!(url = %database_url, "Database connection established");

        Ok(Self { pool })
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        // Users, courts, bookings and games come first; everything else references them
        self.migrate_users().await?;
        self.migrate_payments().await?;
        self.migrate_achievements().await?;
        self.migrate_wearables().await?;
        self.migrate_integrations().await?;
        self.migrate_sms().await?;
        self.migrate_marketplace().await?;

        info!("Database migrations completed");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = test_utils::create_test_db().await;
        db.migrate().await.unwrap();
        db.migrate().await.unwrap();
    }
}
