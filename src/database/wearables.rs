// ABOUTME: Wearable connection and health sample database operations
// ABOUTME: One connection per user and device; samples are stored as JSON documents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, Utc};
use goodrunss_core::errors::AppResult;
use sqlx::{sqlite::SqliteRow, Row};

use super::Database;
use crate::models::{DeviceType, WearableConnection, WearableSample};

impl Database {
    /// Create wearable tables
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_wearables(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_wearable_connections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                device_type TEXT NOT NULL,
                auth_token TEXT,
                connected_at TEXT NOT NULL,
                last_sync TEXT,
                status TEXT NOT NULL DEFAULT 'connected',
                UNIQUE(user_id, device_type)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS wearable_data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                device_type TEXT NOT NULL,
                data_json TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_wearable_data_user ON wearable_data(user_id, device_type, recorded_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Connect a device, replacing the token of an existing connection
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails
    pub async fn upsert_wearable_connection(
        &self,
        user_id: i64,
        device_type: DeviceType,
        auth_token: &str,
    ) -> AppResult<WearableConnection> {
        let row = sqlx::query(
            r"
            INSERT INTO user_wearable_connections (user_id, device_type, auth_token, connected_at, status)
            VALUES ($1, $2, $3, $4, 'connected')
            ON CONFLICT(user_id, device_type) DO UPDATE SET
                auth_token = excluded.auth_token,
                connected_at = excluded.connected_at,
                status = 'connected'
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(device_type.as_str())
        .bind(auth_token)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        row_to_connection(&row)
    }

    /// Connected devices for a user, optionally limited to one device type
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored device type is unknown
    pub async fn list_wearable_connections(
        &self,
        user_id: i64,
        device_type: Option<DeviceType>,
    ) -> AppResult<Vec<WearableConnection>> {
        let mut query = String::from(
            "SELECT * FROM user_wearable_connections WHERE user_id = ? AND status = 'connected'",
        );
        if device_type.is_some() {
            query.push_str(" AND device_type = ?");
        }
        query.push_str(" ORDER BY id");

        let mut sql_query = sqlx::query(&query).bind(user_id);
        if let Some(device) = device_type {
            sql_query = sql_query.bind(device.as_str());
        }

        let rows = sql_query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_connection).collect()
    }

    /// Record a successful sync
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn mark_wearable_synced(
        &self,
        connection_id: i64,
        synced_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE user_wearable_connections SET last_sync = $2 WHERE id = $1")
            .bind(connection_id)
            .bind(synced_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Store a health sample and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded or the insert fails
    pub async fn store_wearable_data(
        &self,
        user_id: i64,
        device_type: DeviceType,
        data: &serde_json::Value,
        recorded_at: DateTime<Utc>,
    ) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO wearable_data (user_id, device_type, data_json, recorded_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(user_id)
        .bind(device_type.as_str())
        .bind(serde_json::to_string(data)?)
        .bind(recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Samples recorded for a device since `since`, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored payload is not valid JSON
    pub async fn list_wearable_data(
        &self,
        user_id: i64,
        device_type: DeviceType,
        since: DateTime<Utc>,
    ) -> AppResult<Vec<WearableSample>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM wearable_data
            WHERE user_id = $1 AND device_type = $2 AND recorded_at >= $3
            ORDER BY recorded_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .bind(device_type.as_str())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_sample).collect()
    }
}

fn row_to_connection(row: &SqliteRow) -> AppResult<WearableConnection> {
    let device_type: String = row.try_get("device_type")?;
    Ok(WearableConnection {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        device_type: device_type.parse()?,
        auth_token: row.try_get("auth_token")?,
        connected_at: row.try_get("connected_at")?,
        last_sync: row.try_get("last_sync")?,
        status: row.try_get("status")?,
    })
}

fn row_to_sample(row: &SqliteRow) -> AppResult<WearableSample> {
    let device_type: String = row.try_get("device_type")?;
    let data_json: String = row.try_get("data_json")?;
    Ok(WearableSample {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        device_type: device_type.parse()?,
        data: serde_json::from_str(&data_json)?,
        recorded_at: row.try_get("recorded_at")?,
    })
}
