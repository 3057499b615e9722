//! Achievement commands: define, list, check

use anyhow::Result;
use repbank_business::{AchievementEngine, EconomyContext, SqlCounterProvider};
use repbank_core::Achievement;

use super::format_time;
use crate::AchievementAction;

pub async fn handle(ctx: &EconomyContext, action: AchievementAction) -> Result<()> {
    let engine = AchievementEngine::new(ctx);

    match action {
        AchievementAction::Define {
            achievement_id,
            name,
            criteria,
            threshold,
            aura_reward,
            description,
        } => {
            let achievement = Achievement::new(
                &achievement_id,
                &name,
                criteria.to_core_type(),
                threshold,
                aura_reward,
            )?
            .with_description(&description);
            engine.define_achievement(&achievement).await?;
            println!(
                "✅ Achievement {} ({} >= {}, +{} Aura)",
                achievement.id, achievement.criteria, achievement.threshold, achievement.aura_reward
            );
        }

        AchievementAction::List { user: None } => {
            let achievements = engine.list_achievements().await?;
            println!("🏆 Achievements ({})", achievements.len());
            for a in achievements {
                println!(
                    "   {:<20} {:<18} >= {:<6} +{:<4} {}",
                    a.id, a.criteria, a.threshold, a.aura_reward, a.name
                );
            }
        }

        AchievementAction::List {
            user: Some(user_id),
        } => {
            let unlocked = engine.list_unlocked(&user_id).await?;
            println!("🏆 Unlocked by {} ({})", user_id, unlocked.len());
            for (a, unlock) in unlocked {
                println!("   {}  {:<20} {}", format_time(unlock.unlocked_at), a.id, a.name);
            }
        }

        AchievementAction::Check {
            user_id,
            criteria,
            value,
        } => {
            let criteria = criteria.to_core_type();
            let unlocked = match value {
                Some(value) => engine.check_and_unlock(&user_id, criteria, value).await?,
                None => {
                    let provider = SqlCounterProvider::new(ctx.pool().clone());
                    engine
                        .refresh_and_unlock(&provider, &user_id, criteria)
                        .await?
                }
            };

            if unlocked.is_empty() {
                println!("ℹ️  No new achievements for {}", user_id);
            }
            for a in unlocked {
                println!("🎉 {} unlocked {} (+{} Aura)", user_id, a.name, a.aura_reward);
            }
        }
    }

    Ok(())
}
