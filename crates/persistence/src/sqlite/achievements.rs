//! Achievement catalog và unlock records

use crate::error::{is_unique_violation, PersistenceResult};
use crate::sqlite::schema::*;
use chrono::{DateTime, Utc};
use repbank_core::{Achievement, AchievementCriteria, AchievementUnlock};
use sqlx::{Executor, Sqlite};

/// Repository cho `achievements` và `user_achievements`
pub struct AchievementRepo;

impl AchievementRepo {
    /// Thêm hoặc cập nhật achievement theo id
    pub async fn upsert<'e, E>(executor: E, achievement: &Achievement) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO achievements (id, name, description, criteria, threshold, aura_reward)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                criteria = excluded.criteria,
                threshold = excluded.threshold,
                aura_reward = excluded.aura_reward
            "#,
        )
        .bind(&achievement.id)
        .bind(&achievement.name)
        .bind(&achievement.description)
        .bind(achievement.criteria.as_str())
        .bind(achievement.threshold)
        .bind(achievement.aura_reward)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Lấy tất cả achievements
    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<Achievement>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AchievementRow>(
            "SELECT * FROM achievements ORDER BY criteria, threshold, id",
        )
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(Achievement::try_from).collect()
    }

    /// Achievements của criteria có threshold <= value
    pub async fn reached<'e, E>(
        executor: E,
        criteria: AchievementCriteria,
        value: i64,
    ) -> PersistenceResult<Vec<Achievement>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, AchievementRow>(
            "SELECT * FROM achievements WHERE criteria = ? AND threshold <= ? ORDER BY threshold, id",
        )
        .bind(criteria.as_str())
        .bind(value)
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(Achievement::try_from).collect()
    }

    /// Ghi unlock record.
    ///
    /// Trả về `false` khi user đã unlock trước đó (unique violation được
    /// xử lý như no-op, không check-then-insert).
    pub async fn insert_unlock<'e, E>(
        executor: E,
        user_id: &str,
        achievement_id: &str,
        unlocked_at: DateTime<Utc>,
    ) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "INSERT INTO user_achievements (user_id, achievement_id, unlocked_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(achievement_id)
        .bind(unlocked_at)
        .execute(executor)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Achievements user đã unlock, mới nhất trước
    pub async fn unlocked_by_user<'e, E>(
        executor: E,
        user_id: &str,
    ) -> PersistenceResult<Vec<(Achievement, AchievementUnlock)>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, UnlockedRow>(
            r#"
            SELECT ua.user_id, a.id, a.name, a.description, a.criteria, a.threshold, a.aura_reward, ua.unlocked_at
            FROM user_achievements ua
            JOIN achievements a ON a.id = ua.achievement_id
            WHERE ua.user_id = ?
            ORDER BY ua.unlocked_at DESC, a.id
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;
        rows.into_iter().map(UnlockedRow::into_parts).collect()
    }

    /// Đếm unlock records của (user, achievement); tối đa 1
    pub async fn unlock_count<'e, E>(
        executor: E,
        user_id: &str,
        achievement_id: &str,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM user_achievements WHERE user_id = ? AND achievement_id = ?",
        )
        .bind(user_id)
        .bind(achievement_id)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }
}
