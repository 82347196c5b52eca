// ABOUTME: Stored vendor integrations for Google, Instagram, and Zoom plus virtual sessions
// ABOUTME: One integration row per user and provider, replaced on reconnect
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::Utc;
use goodrunss_core::errors::AppResult;
use goodrunss_vendors::google::GoogleCredentials;
use sqlx::{sqlite::SqliteRow, Row};

use super::Database;
use crate::models::{
    IntegrationProvider, NewVirtualSession, SocialIntegration, StoredGoogleIntegration,
    VirtualSession, ZoomIntegration,
};

impl Database {
    /// Create integration and virtual session tables
    ///
    /// # Errors
    ///
    /// Returns an error if table creation fails
    pub(super) async fn migrate_integrations(&self) -> AppResult<()> {
        for table in [
            IntegrationProvider::Gmail.table(),
            IntegrationProvider::GoogleCalendar.table(),
        ] {
            sqlx::query(&format!(
                r"
                CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id),
                    provider TEXT NOT NULL,
                    credentials TEXT NOT NULL,
                    connected_at TEXT NOT NULL,
                    status TEXT NOT NULL DEFAULT 'connected',
                    UNIQUE(user_id, provider)
                )
                "
            ))
            .execute(&self.pool)
            .await?;
        }

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS social_integrations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                provider TEXT NOT NULL,
                access_token TEXT NOT NULL,
                provider_user_id TEXT,
                provider_username TEXT,
                connected_at TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'connected',
                UNIQUE(user_id, provider)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS zoom_integrations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
                access_token TEXT NOT NULL,
                zoom_user_id TEXT,
                email TEXT,
                connected_at TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'connected'
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS virtual_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                trainer_name TEXT NOT NULL,
                session_type TEXT,
                start_time TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                zoom_meeting_id TEXT,
                zoom_join_url TEXT,
                zoom_start_url TEXT,
                price REAL,
                status TEXT NOT NULL DEFAULT 'scheduled',
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store Google credentials for Gmail or Calendar, replacing any previous ones
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be encoded or the upsert fails
    pub async fn save_google_integration(
        &self,
        provider: IntegrationProvider,
        user_id: i64,
        credentials: &GoogleCredentials,
    ) -> AppResult<()> {
        let table = provider.table();
        sqlx::query(&format!(
            r"
            INSERT INTO {table} (user_id, provider, credentials, connected_at, status)
            VALUES ($1, $2, $3, $4, 'connected')
            ON CONFLICT(user_id, provider) DO UPDATE SET
                credentials = excluded.credentials,
                connected_at = excluded.connected_at,
                status = 'connected'
            "
        ))
        .bind(user_id)
        .bind(provider.provider())
        .bind(serde_json::to_string(credentials)?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Connected Google integration for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or stored credentials are malformed
    pub async fn get_google_integration(
        &self,
        provider: IntegrationProvider,
        user_id: i64,
    ) -> AppResult<Option<StoredGoogleIntegration>> {
        let table = provider.table();
        let row = sqlx::query(&format!(
            "SELECT * FROM {table} WHERE user_id = $1 AND provider = $2 AND status = 'connected'"
        ))
        .bind(user_id)
        .bind(provider.provider())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| -> AppResult<StoredGoogleIntegration> {
            let credentials: String = row.try_get("credentials")?;
            Ok(StoredGoogleIntegration {
                id: row.try_get("id")?,
                user_id: row.try_get("user_id")?,
                credentials: serde_json::from_str(&credentials)?,
                connected_at: row.try_get("connected_at")?,
            })
        })
        .transpose()
    }

    /// Replace the credentials of an existing Google integration after a refresh
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be encoded or the update fails
    pub async fn update_google_credentials(
        &self,
        provider: IntegrationProvider,
        integration_id: i64,
        credentials: &GoogleCredentials,
    ) -> AppResult<()> {
        let table = provider.table();
        sqlx::query(&format!("UPDATE {table} SET credentials = $2 WHERE id = $1"))
            .bind(integration_id)
            .bind(serde_json::to_string(credentials)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Store a social account link, replacing any previous one for the provider
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails
    pub async fn upsert_social_integration(
        &self,
        user_id: i64,
        provider: &str,
        access_token: &str,
        provider_user_id: &str,
        provider_username: Option<&str>,
    ) -> AppResult<SocialIntegration> {
        let row = sqlx::query(
            r"
            INSERT INTO social_integrations
                (user_id, provider, access_token, provider_user_id, provider_username, connected_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'connected')
            ON CONFLICT(user_id, provider) DO UPDATE SET
                access_token = excluded.access_token,
                provider_user_id = excluded.provider_user_id,
                provider_username = excluded.provider_username,
                connected_at = excluded.connected_at,
                status = 'connected'
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(provider)
        .bind(access_token)
        .bind(provider_user_id)
        .bind(provider_username)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        row_to_social(&row)
    }

    /// Connected social account for a user and provider
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_social_integration(
        &self,
        user_id: i64,
        provider: &str,
    ) -> AppResult<Option<SocialIntegration>> {
        let row = sqlx::query(
            r"
            SELECT * FROM social_integrations
            WHERE user_id = $1 AND provider = $2 AND status = 'connected'
            ",
        )
        .bind(user_id)
        .bind(provider)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_social).transpose()
    }

    /// Store a Zoom account link, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails
    pub async fn upsert_zoom_integration(
        &self,
        user_id: i64,
        access_token: &str,
        zoom_user_id: &str,
        email: Option<&str>,
    ) -> AppResult<ZoomIntegration> {
        let row = sqlx::query(
            r"
            INSERT INTO zoom_integrations (user_id, access_token, zoom_user_id, email, connected_at, status)
            VALUES ($1, $2, $3, $4, $5, 'connected')
            ON CONFLICT(user_id) DO UPDATE SET
                access_token = excluded.access_token,
                zoom_user_id = excluded.zoom_user_id,
                email = excluded.email,
                connected_at = excluded.connected_at,
                status = 'connected'
            RETURNING *
            ",
        )
        .bind(user_id)
        .bind(access_token)
        .bind(zoom_user_id)
        .bind(email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        row_to_zoom(&row)
    }

    /// Connected Zoom account for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_zoom_integration(&self, user_id: i64) -> AppResult<Option<ZoomIntegration>> {
        let row = sqlx::query(
            "SELECT * FROM zoom_integrations WHERE user_id = $1 AND status = 'connected'",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_zoom).transpose()
    }

    /// Store a scheduled virtual session
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_virtual_session(
        &self,
        session: &NewVirtualSession,
    ) -> AppResult<VirtualSession> {
        let row = sqlx::query(
            r"
            INSERT INTO virtual_sessions (
                user_id, trainer_name, session_type, start_time, duration_minutes,
                zoom_meeting_id, zoom_join_url, zoom_start_url, price, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'scheduled', $10)
            RETURNING *
            ",
        )
        .bind(session.user_id)
        .bind(&session.trainer_name)
        .bind(&session.session_type)
        .bind(session.start_time)
        .bind(session.duration_minutes)
        .bind(&session.zoom_meeting_id)
        .bind(&session.zoom_join_url)
        .bind(&session.zoom_start_url)
        .bind(session.price)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        row_to_virtual_session(&row)
    }

    /// A user's virtual sessions, latest start first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_virtual_sessions(&self, user_id: i64) -> AppResult<Vec<VirtualSession>> {
        let rows = sqlx::query(
            "SELECT * FROM virtual_sessions WHERE user_id = $1 ORDER BY start_time DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_virtual_session).collect()
    }
}

fn row_to_social(row: &SqliteRow) -> AppResult<SocialIntegration> {
    Ok(SocialIntegration {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        provider: row.try_get("provider")?,
        access_token: row.try_get("access_token")?,
        provider_user_id: row.try_get("provider_user_id")?,
        provider_username: row.try_get("provider_username")?,
        connected_at: row.try_get("connected_at")?,
    })
}

fn row_to_zoom(row: &SqliteRow) -> AppResult<ZoomIntegration> {
    Ok(ZoomIntegration {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        access_token: row.try_get("access_token")?,
        zoom_user_id: row.try_get("zoom_user_id")?,
        email: row.try_get("email")?,
        connected_at: row.try_get("connected_at")?,
    })
}

fn row_to_virtual_session(row: &SqliteRow) -> AppResult<VirtualSession> {
    Ok(VirtualSession {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        trainer_name: row.try_get("trainer_name")?,
        session_type: row.try_get("session_type")?,
        start_time: row.try_get("start_time")?,
        duration_minutes: row.try_get("duration_minutes")?,
        zoom_meeting_id: row.try_get("zoom_meeting_id")?,
        zoom_join_url: row.try_get("zoom_join_url")?,
        zoom_start_url: row.try_get("zoom_start_url")?,
        price: row.try_get("price")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
    })
}
