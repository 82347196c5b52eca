// ABOUTME: Achievement definitions, unlocks, shares, and leaderboard queries
// ABOUTME: Definitions are seeded idempotently during migration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::Utc;
use goodrunss_core::constants::achievements::SHARE_BONUS_POINTS;
use goodrunss_core::errors::AppResult;
use sqlx::{sqlite::SqliteRow, Row};

use super::Database;
use crate::models::{AchievementDefinition, LeaderboardEntry, UnlockedAchievement};

impl Database {
    /// Create achievement tables and seed the definitions
    ///
    /// # Errors
    ///
    /// Returns an error if table creation or seeding fails
    pub(super) async fn migrate_achievements(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS achievements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                key TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                points INTEGER NOT NULL,
                icon TEXT,
                viral_text TEXT,
                reward TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_achievements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                achievement_key TEXT NOT NULL REFERENCES achievements(key),
                unlocked_at TEXT NOT NULL,
                shared BOOLEAN NOT NULL DEFAULT 0,
                shared_platform TEXT,
                shared_at TEXT,
                UNIQUE(user_id, achievement_key)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        let now = Utc::now();
        for definition in AchievementDefinition::all() {
            sqlx::query(
                r"
                INSERT OR IGNORE INTO achievements
                    (key, name, description, points, icon, viral_text, reward, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(definition.key)
            .bind(definition.name)
            .bind(definition.description)
            .bind(definition.points)
            .bind(definition.icon)
            .bind(definition.viral_text)
            .bind(definition.reward)
            .bind(now)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Achievements a user has unlocked, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_user_achievements(&self, user_id: i64) -> AppResult<Vec<UnlockedAchievement>> {
        let rows = sqlx::query(
            r"
            SELECT a.key, a.name, a.description, a.points, a.icon, a.viral_text, a.reward,
                   ua.unlocked_at, ua.shared, ua.shared_platform, ua.shared_at
            FROM user_achievements ua
            JOIN achievements a ON a.key = ua.achievement_key
            WHERE ua.user_id = $1
            ORDER BY ua.unlocked_at, ua.id
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_unlocked).collect()
    }

    /// Unlock an achievement. Returns false if it was already unlocked.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn unlock_achievement(&self, user_id: i64, key: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            INSERT OR IGNORE INTO user_achievements (user_id, achievement_key, unlocked_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(user_id)
        .bind(key)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark an unlocked achievement as shared. Returns false if it is not unlocked.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails
    pub async fn share_achievement(
        &self,
        user_id: i64,
        key: &str,
        platform: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE user_achievements
            SET shared = 1, shared_platform = $3, shared_at = $4
            WHERE user_id = $1 AND achievement_key = $2
            ",
        )
        .bind(user_id)
        .bind(key)
        .bind(platform)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of achievements the user has shared
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count_shared_achievements(&self, user_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_achievements WHERE user_id = $1 AND shared = 1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Users ranked by achievement points plus share bonuses
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn achievement_leaderboard(&self, limit: u32) -> AppResult<Vec<LeaderboardEntry>> {
        let rows = sqlx::query(
            r"
            SELECT u.id AS user_id,
                   u.name AS name,
                   SUM(a.points) + $1 * SUM(CASE WHEN ua.shared THEN 1 ELSE 0 END) AS total_points,
                   COUNT(ua.id) AS achievements_count
            FROM user_achievements ua
            JOIN users u ON u.id = ua.user_id
            JOIN achievements a ON a.key = ua.achievement_key
            GROUP BY u.id, u.name
            ORDER BY total_points DESC, u.id ASC
            LIMIT $2
            ",
        )
        .bind(SHARE_BONUS_POINTS)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        (1_u32..)
            .zip(rows.iter())
            .map(|(rank, row)| -> AppResult<LeaderboardEntry> {
                Ok(LeaderboardEntry {
                    rank,
                    user_id: row.try_get("user_id")?,
                    name: row.try_get("name")?,
                    total_points: row.try_get("total_points")?,
                    achievements_count: row.try_get("achievements_count")?,
                })
            })
            .collect()
    }
}

fn row_to_unlocked(row: &SqliteRow) -> AppResult<UnlockedAchievement> {
    Ok(UnlockedAchievement {
        key: row.try_get("key")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        points: row.try_get("points")?,
        icon: row.try_get("icon")?,
        viral_text: row.try_get("viral_text")?,
        reward: row.try_get("reward")?,
        unlocked_at: row.try_get("unlocked_at")?,
        shared: row.try_get("shared")?,
        shared_platform: row.try_get("shared_platform")?,
        shared_at: row.try_get("shared_at")?,
    })
}
