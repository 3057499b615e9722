//! # Achievement Module
//!
//! Achievement được mở khóa khi counter của user đạt threshold.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Counter key mà achievement theo dõi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementCriteria {
    /// Số bài tập đã giải (platform cung cấp)
    ProblemSolved,
    PostsCreated,
    CommentsCreated,
    AnswersAccepted,
    /// Chuỗi ngày hoạt động liên tiếp (platform cung cấp)
    DailyStreak,
    /// Tổng Aura hiện tại
    AuraEarned,
}

impl AchievementCriteria {
    pub fn all() -> [AchievementCriteria; 6] {
        [
            AchievementCriteria::ProblemSolved,
            AchievementCriteria::PostsCreated,
            AchievementCriteria::CommentsCreated,
            AchievementCriteria::AnswersAccepted,
            AchievementCriteria::DailyStreak,
            AchievementCriteria::AuraEarned,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementCriteria::ProblemSolved => "PROBLEM_SOLVED",
            AchievementCriteria::PostsCreated => "POSTS_CREATED",
            AchievementCriteria::CommentsCreated => "COMMENTS_CREATED",
            AchievementCriteria::AnswersAccepted => "ANSWERS_ACCEPTED",
            AchievementCriteria::DailyStreak => "DAILY_STREAK",
            AchievementCriteria::AuraEarned => "AURA_EARNED",
        }
    }
}

impl FromStr for AchievementCriteria {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::all()
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::unknown("achievement criteria", s))
    }
}

impl fmt::Display for AchievementCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Định nghĩa một achievement trong catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub criteria: AchievementCriteria,
    pub threshold: i64,
    #[serde(default)]
    pub aura_reward: i64,
}

impl Achievement {
    pub fn new(
        id: &str,
        name: &str,
        criteria: AchievementCriteria,
        threshold: i64,
        aura_reward: i64,
    ) -> CoreResult<Self> {
        if threshold < 0 {
            return Err(CoreError::ValidationError(format!(
                "threshold must be >= 0, got {threshold}"
            )));
        }
        if aura_reward < 0 {
            return Err(CoreError::InvalidAmount(format!(
                "aura reward must be >= 0, got {aura_reward}"
            )));
        }
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            criteria,
            threshold,
            aura_reward,
        })
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn is_reached(&self, current_value: i64) -> bool {
        self.threshold <= current_value
    }
}

/// Bản ghi user đã mở khóa achievement. Unique theo (user_id, achievement_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementUnlock {
    pub user_id: String,
    pub achievement_id: String,
    pub unlocked_at: DateTime<Utc>,
}
