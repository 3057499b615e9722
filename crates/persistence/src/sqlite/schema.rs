//! Database schema definitions
//!
//! Row types cho sqlx mapping từ SQLite tables.
//! Schema được định nghĩa trong migrations/

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, Utc};
use repbank_core::{
    Achievement, AchievementCriteria, AchievementUnlock, BountyState, LedgerEntry, LedgerReason,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row type cho bảng `aura_ledger` và `cipher_ledger`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct LedgerRow {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    pub reason: String,
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LedgerRow {
    /// Parse reason code về enum của currency tương ứng
    pub fn into_entry<R: LedgerReason>(self) -> PersistenceResult<LedgerEntry<R>> {
        let reason = self
            .reason
            .parse::<R>()
            .map_err(|_| PersistenceError::invalid_enum("reason", &self.reason))?;

        Ok(LedgerEntry {
            id: self.id,
            user_id: self.user_id,
            amount: self.amount,
            reason,
            source_id: self.source_id,
            created_at: self.created_at,
        })
    }
}

/// Row type cho bảng `cipher_accounts`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CipherAccountRow {
    pub user_id: String,
    pub balance: i64,
    pub updated_at: DateTime<Utc>,
}

/// Loại post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Post,
    Question,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Post => "post",
            PostType::Question => "question",
        }
    }

    pub fn parse(s: &str) -> PersistenceResult<Self> {
        match s {
            "post" => Ok(PostType::Post),
            "question" => Ok(PostType::Question),
            other => Err(PersistenceError::invalid_enum("post_type", other)),
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Row type cho bảng `posts`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PostRow {
    pub id: String,
    pub author_id: String,
    pub post_type: String,
    pub title: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub bounty_amount: i64,
    pub is_bounty_paid: bool,
    pub accepted_answer_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PostRow {
    pub fn new(id: &str, author_id: &str, post_type: PostType, title: &str) -> Self {
        Self {
            id: id.to_string(),
            author_id: author_id.to_string(),
            post_type: post_type.as_str().to_string(),
            title: title.to_string(),
            upvotes: 0,
            downvotes: 0,
            bounty_amount: 0,
            is_bounty_paid: false,
            accepted_answer_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_bounty(mut self, amount: i64) -> Self {
        self.bounty_amount = amount;
        self
    }

    pub fn kind(&self) -> PersistenceResult<PostType> {
        PostType::parse(&self.post_type)
    }

    pub fn is_question(&self) -> bool {
        self.post_type == PostType::Question.as_str()
    }

    pub fn bounty(&self) -> BountyState {
        BountyState {
            bounty_amount: self.bounty_amount,
            is_bounty_paid: self.is_bounty_paid,
            accepted_answer_id: self.accepted_answer_id.clone(),
        }
    }
}

/// Row type cho bảng `comments`. Answer = comment top-level trên question.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: String,
    pub post_id: String,
    pub parent_id: Option<String>,
    pub author_id: String,
    pub body: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub created_at: DateTime<Utc>,
}

impl CommentRow {
    pub fn new(id: &str, post_id: &str, author_id: &str, body: &str) -> Self {
        Self {
            id: id.to_string(),
            post_id: post_id.to_string(),
            parent_id: None,
            author_id: author_id.to_string(),
            body: body.to_string(),
            upvotes: 0,
            downvotes: 0,
            created_at: Utc::now(),
        }
    }

    pub fn reply_to(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Row type cho bảng `achievements`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AchievementRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub criteria: String,
    pub threshold: i64,
    pub aura_reward: i64,
}

/// Achievement đã mở khóa, join với `user_achievements`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct UnlockedRow {
    pub user_id: String,
    pub id: String,
    pub name: String,
    pub description: String,
    pub criteria: String,
    pub threshold: i64,
    pub aura_reward: i64,
    pub unlocked_at: DateTime<Utc>,
}

// === Conversion implementations ===

impl From<&Achievement> for AchievementRow {
    fn from(a: &Achievement) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone(),
            description: a.description.clone(),
            criteria: a.criteria.as_str().to_string(),
            threshold: a.threshold,
            aura_reward: a.aura_reward,
        }
    }
}

impl TryFrom<AchievementRow> for Achievement {
    type Error = PersistenceError;

    fn try_from(row: AchievementRow) -> PersistenceResult<Self> {
        let criteria = row
            .criteria
            .parse::<AchievementCriteria>()
            .map_err(|_| PersistenceError::invalid_enum("criteria", &row.criteria))?;

        Ok(Achievement {
            id: row.id,
            name: row.name,
            description: row.description,
            criteria,
            threshold: row.threshold,
            aura_reward: row.aura_reward,
        })
    }
}

impl UnlockedRow {
    pub fn into_parts(self) -> PersistenceResult<(Achievement, AchievementUnlock)> {
        let unlock = AchievementUnlock {
            user_id: self.user_id,
            achievement_id: self.id.clone(),
            unlocked_at: self.unlocked_at,
        };
        let achievement = Achievement::try_from(AchievementRow {
            id: self.id,
            name: self.name,
            description: self.description,
            criteria: self.criteria,
            threshold: self.threshold,
            aura_reward: self.aura_reward,
        })?;
        Ok((achievement, unlock))
    }
}
