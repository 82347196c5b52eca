// ABOUTME: Achievement definitions, unlocked achievements, and leaderboard rows
// ABOUTME: Definitions are static and seeded into the achievements table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static description of an achievement users can unlock
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AchievementDefinition {
    /// Stable key
    pub key: &'static str,
    /// Display name
    pub name: &'static str,
    /// What the user did
    pub description: &'static str,
    /// Points awarded
    pub points: i64,
    /// Emoji shown in clients
    pub icon: &'static str,
    /// Text suggested when sharing
    pub viral_text: &'static str,
    /// Optional reward granted on unlock
    pub reward: Option<&'static str>,
}

impl AchievementDefinition {
    /// First completed booking
    pub const FIRST_BOOKING: &'static str = "first_booking";
    /// Seven bookings within a week
    pub const SEVEN_DAY_STREAK: &'static str = "seven_day_streak";
    /// Fast court search
    pub const QUICK_COURT_FIND: &'static str = "quick_court_find";
    /// Game with a perfect score
    pub const PERFECT_GAME: &'static str = "perfect_game";
    /// Several achievements shared
    pub const SOCIAL_SHARER: &'static str = "social_sharer";

    /// Every achievement, in display order
    #[must_use]
    pub fn all() -> &'static [Self] {
        &DEFINITIONS
    }

    /// Look up a definition by key
    #[must_use]
    pub fn find(key: &str) -> Option<&'static Self> {
        DEFINITIONS.iter().find(|definition| definition.key == key)
    }
}

static DEFINITIONS: [AchievementDefinition; 5] = [
    AchievementDefinition {
        key: AchievementDefinition::FIRST_BOOKING,
        name: "First Booking",
        description: "Booked your first court or training session",
        points: 50,
        icon: "🏀",
        viral_text: "Just booked my first session on GoodRunss! 🏀",
        reward: None,
    },
    AchievementDefinition {
        key: AchievementDefinition::SEVEN_DAY_STREAK,
        name: "7-Day Streak",
        description: "Booked sessions 7 days in a row",
        points: 100,
        icon: "🔥",
        viral_text: "7 days straight on the court! 🔥 #GoodRunss",
        reward: Some("Free Training Session"),
    },
    AchievementDefinition {
        key: AchievementDefinition::QUICK_COURT_FIND,
        name: "Quick Court Finder",
        description: "Found and booked a court in under a minute",
        points: 75,
        icon: "⚡",
        viral_text: "Found a court in seconds with GoodRunss ⚡",
        reward: None,
    },
    AchievementDefinition {
        key: AchievementDefinition::PERFECT_GAME,
        name: "Perfect Game",
        description: "Recorded a perfect game score",
        points: 150,
        icon: "🏆",
        viral_text: "Perfect game today! 🏆 #GoodRunss",
        reward: None,
    },
    AchievementDefinition {
        key: AchievementDefinition::SOCIAL_SHARER,
        name: "Social Sharer",
        description: "Shared 5 achievements with friends",
        points: 25,
        icon: "📣",
        viral_text: "Sharing the hustle with my crew 📣 #GoodRunss",
        reward: None,
    },
];

/// Achievement a user has unlocked, joined with its definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnlockedAchievement {
    /// Achievement key
    pub key: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Points awarded
    pub points: i64,
    /// Emoji
    pub icon: Option<String>,
    /// Share text
    pub viral_text: Option<String>,
    /// Reward granted
    pub reward: Option<String>,
    /// Unlock time
    pub unlocked_at: DateTime<Utc>,
    /// Whether the user shared it
    pub shared: bool,
    /// Platform it was shared to
    pub shared_platform: Option<String>,
    /// Share time
    pub shared_at: Option<DateTime<Utc>>,
}

/// One leaderboard row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: u32,
    /// User id
    pub user_id: i64,
    /// Display name
    pub name: String,
    /// Achievement points plus share bonuses
    pub total_points: i64,
    /// Number of unlocked achievements
    pub achievements_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_are_unique_and_findable() {
        for definition in AchievementDefinition::all() {
            assert_eq!(
                AchievementDefinition::find(definition.key).map(|d| d.key),
                Some(definition.key)
            );
        }
        assert!(AchievementDefinition::find("unknown").is_none());
    }

    #[test]
    fn test_streak_carries_reward() {
        let streak = AchievementDefinition::find(AchievementDefinition::SEVEN_DAY_STREAK).unwrap();
        assert_eq!(streak.points, 100);
        assert_eq!(streak.reward, Some("Free Training Session"));
    }
}
