//! Achievement Engine - threshold unlocks
//!
//! Caller đưa vào counter hiện tại; engine unlock mọi achievement của criteria
//! có `threshold <= value` mà user chưa có. Mỗi (user, achievement) chỉ unlock
//! một lần, nhờ primary key của `user_achievements`.

use crate::aura::AuraService;
use crate::context::EconomyContext;
use crate::counters::CounterProvider;
use crate::error::BusinessResult;
use chrono::Utc;
use repbank_core::{
    Achievement, AchievementCriteria, AchievementUnlock, AuraReason, Notification, NotificationKind,
};
use repbank_persistence::AchievementRepo;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Achievement Engine
pub struct AchievementEngine<'a> {
    ctx: &'a EconomyContext,
}

impl<'a> AchievementEngine<'a> {
    pub fn new(ctx: &'a EconomyContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Thêm hoặc cập nhật achievement theo id
    pub async fn define_achievement(&self, achievement: &Achievement) -> BusinessResult<()> {
        AchievementRepo::upsert(self.ctx.pool(), achievement).await?;
        info!(
            achievement_id = %achievement.id,
            criteria = %achievement.criteria,
            threshold = achievement.threshold,
            "Achievement defined"
        );
        Ok(())
    }

    pub async fn list_achievements(&self) -> BusinessResult<Vec<Achievement>> {
        Ok(AchievementRepo::get_all(self.ctx.pool()).await?)
    }

    pub async fn list_unlocked(
        &self,
        user_id: &str,
    ) -> BusinessResult<Vec<(Achievement, AchievementUnlock)>> {
        Ok(AchievementRepo::unlocked_by_user(self.ctx.pool(), user_id).await?)
    }

    // ========================================================================
    // Unlocks
    // ========================================================================

    /// Unlock các achievement đạt ngưỡng; trả về những cái mới unlock lần này.
    ///
    /// Unlock đã tồn tại là no-op. Aura reward và notification là best-effort.
    pub async fn check_and_unlock(
        &self,
        user_id: &str,
        criteria: AchievementCriteria,
        current_value: i64,
    ) -> BusinessResult<Vec<Achievement>> {
        let candidates = AchievementRepo::reached(self.ctx.pool(), criteria, current_value).await?;

        let mut unlocked = Vec::new();
        for achievement in candidates {
            let now = Utc::now();
            if !AchievementRepo::insert_unlock(self.ctx.pool(), user_id, &achievement.id, now)
                .await?
            {
                debug!(user_id, achievement_id = %achievement.id, "Already unlocked");
                continue;
            }

            info!(
                user_id,
                achievement_id = %achievement.id,
                %criteria,
                current_value,
                "Achievement unlocked"
            );

            if achievement.aura_reward > 0 {
                if let Err(e) = AuraService::new(self.ctx)
                    .award(
                        user_id,
                        achievement.aura_reward,
                        AuraReason::AchievementUnlocked,
                        Some(&achievement.id),
                    )
                    .await
                {
                    warn!(
                        user_id,
                        achievement_id = %achievement.id,
                        error = %e,
                        "Achievement Aura reward failed"
                    );
                }
            }

            self.ctx.notifications().dispatch(
                Notification::new(
                    user_id,
                    NotificationKind::AchievementUnlocked,
                    format!("Achievement unlocked: {}", achievement.name),
                )
                .with_action_url("/achievements")
                .with_data(json!({
                    "achievement_id": achievement.id,
                    "aura_reward": achievement.aura_reward,
                })),
            );

            unlocked.push(achievement);
        }

        Ok(unlocked)
    }

    /// Counter hiện tại của user từ provider
    pub async fn get_user_count(
        &self,
        provider: &dyn CounterProvider,
        user_id: &str,
        criteria: AchievementCriteria,
    ) -> BusinessResult<i64> {
        provider.count(user_id, criteria).await
    }

    /// Lấy counter từ provider rồi `check_and_unlock`
    pub async fn refresh_and_unlock(
        &self,
        provider: &dyn CounterProvider,
        user_id: &str,
        criteria: AchievementCriteria,
    ) -> BusinessResult<Vec<Achievement>> {
        let value = self.get_user_count(provider, user_id, criteria).await?;
        self.check_and_unlock(user_id, criteria, value).await
    }

    /// Chạy `check_and_unlock` trên background task; lỗi chỉ được log.
    pub fn spawn_check(
        &self,
        user_id: &str,
        criteria: AchievementCriteria,
        current_value: i64,
    ) -> JoinHandle<()> {
        let ctx = self.ctx.clone();
        let user_id = user_id.to_string();
        tokio::spawn(async move {
            let engine = AchievementEngine::new(&ctx);
            if let Err(e) = engine.check_and_unlock(&user_id, criteria, current_value).await {
                warn!(user_id = %user_id, %criteria, error = %e, "Achievement check failed");
            }
        })
    }
}
