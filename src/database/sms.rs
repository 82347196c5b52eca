// ABOUTME: SMS log and two-factor code database operations
// ABOUTME: Verification codes are consumed atomically so each code is accepted at most once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, Utc};
use goodrunss_core::errors::AppResult;
use sqlx::{sqlite::SqliteRow, Row};

use super::Database;
use crate::models::SmsLog;

impl Database {
    /// Create SMS tables
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_sms(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS sms_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                phone_number TEXT NOT NULL,
                message TEXT NOT NULL,
                twilio_sid TEXT,
                status TEXT,
                sent_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS two_factor_codes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                phone_number TEXT NOT NULL,
                code TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                used BOOLEAN NOT NULL DEFAULT 0,
                verified_at TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_two_factor_lookup ON two_factor_codes(user_id, phone_number, code)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record an outbound SMS and return the log id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn log_sms(
        &self,
        user_id: i64,
        phone_number: &str,
        message: &str,
        twilio_sid: &str,
        status: &str,
    ) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO sms_logs (user_id, phone_number, message, twilio_sid, status, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(user_id)
        .bind(phone_number)
        .bind(message)
        .bind(twilio_sid)
        .bind(status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// SMS messages sent on behalf of a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_sms_logs(&self, user_id: i64) -> AppResult<Vec<SmsLog>> {
        let rows = sqlx::query("SELECT * FROM sms_logs WHERE user_id = $1 ORDER BY id DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_sms_log).collect()
    }

    /// Store a verification code
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn store_two_factor_code(
        &self,
        user_id: i64,
        phone_number: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO two_factor_codes (user_id, phone_number, code, expires_at, used, created_at)
            VALUES ($1, $2, $3, $4, 0, $5)
            ",
        )
        .bind(user_id)
        .bind(phone_number)
        .bind(code)
        .bind(expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Accept a verification code if it matches, is unused and has not expired
    ///
    /// The code is marked used in the same statement, so concurrent attempts
    /// cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn consume_two_factor_code(
        &self,
        user_id: i64,
        phone_number: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE two_factor_codes
            SET used = 1, verified_at = $4
            WHERE id = (
                SELECT id FROM two_factor_codes
                WHERE user_id = $1 AND phone_number = $2 AND code = $3
                  AND used = 0 AND expires_at > $4
                ORDER BY id DESC
                LIMIT 1
            )
            ",
        )
        .bind(user_id)
        .bind(phone_number)
        .bind(code)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_sms_log(row: &SqliteRow) -> AppResult<SmsLog> {
    Ok(SmsLog {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        phone_number: row.try_get("phone_number")?,
        message: row.try_get("message")?,
        twilio_sid: row.try_get("twilio_sid")?,
        status: row.try_get("status")?,
        sent_at: row.try_get("sent_at")?,
    })
}
