// ABOUTME: Payment transaction database operations
// ABOUTME: Records booking charges and computes trainer balances
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::Utc;
use goodrunss_core::constants::payments::STATUS_COMPLETED;
use goodrunss_core::errors::AppResult;
use sqlx::{sqlite::SqliteRow, Row};

use super::Database;
use crate::models::{NewTransaction, Transaction};

impl Database {
    /// Create the `transactions` table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_payments(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                amount REAL NOT NULL,
                platform_fee REAL NOT NULL,
                trainer_amount REAL NOT NULL,
                stripe_payment_intent_id TEXT,
                booking_id INTEGER REFERENCES bookings(id),
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_transactions_booking ON transactions(booking_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a transaction and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn record_transaction(&self, transaction: &NewTransaction) -> AppResult<i64> {
        let result = sqlx::query(
            r"
            INSERT INTO transactions (user_id, amount, platform_fee, trainer_amount,
                                      stripe_payment_intent_id, booking_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(transaction.user_id)
        .bind(transaction.amount)
        .bind(transaction.platform_fee)
        .bind(transaction.trainer_amount)
        .bind(&transaction.stripe_payment_intent_id)
        .bind(transaction.booking_id)
        .bind(&transaction.status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Transactions recorded against a booking
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_booking_transactions(&self, booking_id: i64) -> AppResult<Vec<Transaction>> {
        let rows = sqlx::query("SELECT * FROM transactions WHERE booking_id = $1 ORDER BY id")
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_transaction).collect()
    }

    /// Sum of trainer payouts over completed transactions for the trainer's bookings
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn trainer_available_balance(&self, trainer_id: i64) -> AppResult<f64> {
        let balance: f64 = sqlx::query_scalar(
            r"
            SELECT COALESCE(SUM(t.trainer_amount), 0.0)
            FROM transactions t
            JOIN bookings b ON t.booking_id = b.id
            WHERE b.trainer_id = $1 AND t.status = $2
            ",
        )
        .bind(trainer_id)
        .bind(STATUS_COMPLETED)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }
}

fn row_to_transaction(row: &SqliteRow) -> AppResult<Transaction> {
    Ok(Transaction {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        amount: row.try_get("amount")?,
        platform_fee: row.try_get("platform_fee")?,
        trainer_amount: row.try_get("trainer_amount")?,
        stripe_payment_intent_id: row.try_get("stripe_payment_intent_id")?,
        booking_id: row.try_get("booking_id")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
    })
}
