//! Counter providers cho achievement criteria
//!
//! Engine không tự biết user đã giải bao nhiêu problem hay streak bao nhiêu
//! ngày; các counter đó thuộc platform và được cung cấp qua `CounterProvider`.

use crate::error::{BusinessError, BusinessResult};
use async_trait::async_trait;
use repbank_core::{AchievementCriteria, CurrencyKind};
use repbank_persistence::{CommentRepo, LedgerRepo, PostRepo};
use sqlx::SqlitePool;

/// Nguồn counter hiện tại của user cho một criteria
#[async_trait]
pub trait CounterProvider: Send + Sync {
    async fn count(&self, user_id: &str, criteria: AchievementCriteria) -> BusinessResult<i64>;
}

/// Counters tính được từ bảng của engine và content
pub struct SqlCounterProvider {
    pool: SqlitePool,
}

impl SqlCounterProvider {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterProvider for SqlCounterProvider {
    async fn count(&self, user_id: &str, criteria: AchievementCriteria) -> BusinessResult<i64> {
        match criteria {
            AchievementCriteria::PostsCreated => {
                Ok(PostRepo::count_by_author(&self.pool, user_id).await?)
            }
            AchievementCriteria::CommentsCreated => {
                Ok(CommentRepo::count_by_author(&self.pool, user_id).await?)
            }
            AchievementCriteria::AnswersAccepted => {
                Ok(PostRepo::count_accepted_answers(&self.pool, user_id).await?)
            }
            AchievementCriteria::AuraEarned => {
                Ok(LedgerRepo::sum_for_user(&self.pool, CurrencyKind::Aura, user_id).await?)
            }
            AchievementCriteria::ProblemSolved | AchievementCriteria::DailyStreak => {
                Err(BusinessError::UnsupportedCriteria(criteria))
            }
        }
    }
}

