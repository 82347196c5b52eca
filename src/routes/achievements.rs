// ABOUTME: Achievement routes for unlocking, sharing, and ranking viral moments
// ABOUTME: Evaluates unlock rules against bookings, games, and shares recorded for a user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use goodrunss_core::constants::achievements::{
    DEFAULT_LEADERBOARD_LIMIT, PERFECT_GAME_SCORE, SHARES_FOR_SOCIAL_SHARER, SHARE_BONUS_POINTS,
    STREAK_BOOKINGS_REQUIRED, STREAK_WINDOW_DAYS,
};
use goodrunss_core::errors::{AppError, AppResult};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::database::Database;
use crate::models::AchievementDefinition;
use crate::resources::ServerResources;

/// Activity counters the unlock rules are evaluated against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AchievementProgress {
    /// All bookings ever made
    pub total_bookings: i64,
    /// Bookings created inside the streak window
    pub recent_bookings: i64,
    /// Games finished with a perfect score
    pub perfect_games: i64,
    /// Achievements already shared
    pub shared_achievements: i64,
}

impl AchievementProgress {
    /// Gather counters for a user
    ///
    /// # Errors
    ///
    /// Returns an error if any count query fails
    pub async fn load(database: &Database, user_id: i64) -> AppResult<Self> {
        let window_start = Utc::now() - Duration::days(STREAK_WINDOW_DAYS);
        Ok(Self {
            total_bookings: database.count_user_bookings(user_id, None).await?,
            recent_bookings: database
                .count_user_bookings(user_id, Some(window_start))
                .await?,
            perfect_games: database
                .count_games_with_score(user_id, PERFECT_GAME_SCORE)
                .await?,
            shared_achievements: database.count_shared_achievements(user_id).await?,
        })
    }

    /// Keys of every achievement these counters qualify for
    #[must_use]
    pub fn earned_keys(&self) -> Vec<&'static str> {
        let rules = [
            (AchievementDefinition::FIRST_BOOKING, self.total_bookings >= 1),
            (
                AchievementDefinition::SEVEN_DAY_STREAK,
                self.recent_bookings >= STREAK_BOOKINGS_REQUIRED,
            ),
            (AchievementDefinition::PERFECT_GAME, self.perfect_games >= 1),
            (
                AchievementDefinition::SOCIAL_SHARER,
                self.shared_achievements >= SHARES_FOR_SOCIAL_SHARER,
            ),
        ];

        rules
            .into_iter()
            .filter_map(|(key, earned)| earned.then_some(key))
            .collect()
    }
}

/// Query parameters for the share endpoint
#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    /// Social platform the achievement was shared to
    pub platform: Option<String>,
}

/// Query parameters for the leaderboard
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    /// Number of users to return
    pub limit: Option<u32>,
}

/// Achievement routes
pub struct AchievementRoutes;

impl AchievementRoutes {
    /// Create all achievement routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/v1/achievements/user/:user_id",
                get(Self::handle_user_achievements),
            )
            .route(
                "/api/v1/achievements/check/:user_id",
                post(Self::handle_check),
            )
            .route(
                "/api/v1/achievements/share/:user_id/:achievement_key",
                post(Self::handle_share),
            )
            .route(
                "/api/v1/achievements/leaderboard",
                get(Self::handle_leaderboard),
            )
            .with_state(resources)
    }

    /// Handle GET /api/v1/achievements/user/:user_id
    async fn handle_user_achievements(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let achievements = resources.database.list_user_achievements(user_id).await?;
        let total_points: i64 = achievements.iter().map(|a| a.points).sum();

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "user_id": user_id,
                "count": achievements.len(),
                "total_points": total_points,
                "achievements": achievements,
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/achievements/check/:user_id
    async fn handle_check(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        if resources.database.get_user(user_id).await?.is_none() {
            return Err(AppError::not_found("User").with_resource_id(user_id.to_string()));
        }

        let progress = AchievementProgress::load(&resources.database, user_id).await?;

        let mut unlocked = Vec::new();
        for key in progress.earned_keys() {
            if resources.database.unlock_achievement(user_id, key).await? {
                if let Some(definition) = AchievementDefinition::find(key) {
                    unlocked.push(*definition);
                }
            }
        }

        if !unlocked.is_empty() {
            info!(user_id, count = unlocked.len(), "Achievements unlocked");
        }

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "user_id": user_id,
                "new_achievements": unlocked,
                "count": unlocked.len(),
            })),
        )
            .into_response())
    }

    /// Handle POST /api/v1/achievements/share/:user_id/:achievement_key
    async fn handle_share(
        State(resources): State<Arc<ServerResources>>,
        Path((user_id, achievement_key)): Path<(i64, String)>,
        Query(query): Query<ShareQuery>,
    ) -> Result<Response, AppError> {
        let platform = query
            .platform
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::missing_field("platform"))?;

        let shared = resources
            .database
            .share_achievement(user_id, &achievement_key, &platform)
            .await?;
        if !shared {
            return Err(AppError::not_found("Unlocked achievement")
                .with_resource_id(achievement_key));
        }

        let viral_text = AchievementDefinition::find(&achievement_key)
            .map(|definition| definition.viral_text);

        info!(user_id, achievement = %achievement_key, platform = %platform, "Achievement shared");

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "achievement_key": achievement_key,
                "platform": platform,
                "viral_text": viral_text,
                "bonus_points": SHARE_BONUS_POINTS,
            })),
        )
            .into_response())
    }

    /// Handle GET /api/v1/achievements/leaderboard
    async fn handle_leaderboard(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<LeaderboardQuery>,
    ) -> Result<Response, AppError> {
        let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
        let leaderboard = resources.database.achievement_leaderboard(limit).await?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "leaderboard": leaderboard,
            })),
        )
            .into_response())
    }
}
