//! Achievement Engine: catalog, threshold unlocks, counter providers

mod common;

use async_trait::async_trait;
use common::TestEnv;
use repbank_business::{
    AchievementEngine, AuraService, BountyEscrow, BusinessError, BusinessResult, CounterProvider,
    NewQuestion, SqlCounterProvider,
};
use repbank_core::{Achievement, AchievementCriteria, AuraReason, NotificationKind};

/// Fixed counter, standing in for platform-owned statistics
struct FixedCounter(i64);

#[async_trait]
impl CounterProvider for FixedCounter {
    async fn count(&self, _user_id: &str, _criteria: AchievementCriteria) -> BusinessResult<i64> {
        Ok(self.0)
    }
}

fn achievement(id: &str, criteria: AchievementCriteria, threshold: i64, reward: i64) -> Achievement {
    Achievement::new(id, id, criteria, threshold, reward).unwrap()
}

#[tokio::test]
async fn test_threshold_unlock_awards_once() {
    let env = TestEnv::new().await;
    let engine = AchievementEngine::new(&env.ctx);
    engine
        .define_achievement(&achievement("solver-5", AchievementCriteria::ProblemSolved, 5, 25))
        .await
        .unwrap();

    let below = engine
        .check_and_unlock("alice", AchievementCriteria::ProblemSolved, 4)
        .await
        .unwrap();
    assert!(below.is_empty());

    let first = engine
        .check_and_unlock("alice", AchievementCriteria::ProblemSolved, 5)
        .await
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, "solver-5");

    let again = engine
        .check_and_unlock("alice", AchievementCriteria::ProblemSolved, 10)
        .await
        .unwrap();
    assert!(again.is_empty());

    let aura = AuraService::new(&env.ctx);
    assert_eq!(aura.get_points("alice").await.unwrap(), 25);
    let history = aura.get_history("alice", 10, 0).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].reason, AuraReason::AchievementUnlocked);
    assert_eq!(history[0].source_id.as_deref(), Some("solver-5"));

    let unlocked = engine.list_unlocked("alice").await.unwrap();
    assert_eq!(unlocked.len(), 1);
    let (unlocked_achievement, unlock) = &unlocked[0];
    assert_eq!(unlocked_achievement.id, "solver-5");
    assert_eq!(unlock.user_id, "alice");
    assert_eq!(unlock.achievement_id, "solver-5");

    let notification = env.next_notification().await.unwrap();
    assert_eq!(notification.kind, NotificationKind::AchievementUnlocked);
    assert_eq!(notification.user_id, "alice");
    assert_eq!(notification.data["achievement_id"], "solver-5");
}

#[tokio::test]
async fn test_aura_failure_keeps_unlock() {
    let env = TestEnv::new().await;
    let engine = AchievementEngine::new(&env.ctx);
    engine
        .define_achievement(&achievement("solver-5", AchievementCriteria::ProblemSolved, 5, 25))
        .await
        .unwrap();
    env.break_aura_ledger().await;

    let unlocked = engine
        .check_and_unlock("alice", AchievementCriteria::ProblemSolved, 5)
        .await
        .unwrap();
    assert_eq!(unlocked.len(), 1);

    let stored = engine.list_unlocked("alice").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].1.achievement_id, "solver-5");
    assert_eq!(AuraService::new(&env.ctx).get_points("alice").await.unwrap(), 0);

    // Still unlocked exactly once
    assert!(engine
        .check_and_unlock("alice", AchievementCriteria::ProblemSolved, 6)
        .await
        .unwrap()
        .is_empty());

    let notification = env.next_notification().await.unwrap();
    assert_eq!(notification.kind, NotificationKind::AchievementUnlocked);
}

#[tokio::test]
async fn test_multiple_thresholds_and_criteria() {
    let env = TestEnv::new().await;
    let engine = AchievementEngine::new(&env.ctx);
    for a in [
        achievement("posts-1", AchievementCriteria::PostsCreated, 1, 0),
        achievement("posts-10", AchievementCriteria::PostsCreated, 10, 5),
        achievement("posts-100", AchievementCriteria::PostsCreated, 100, 50),
        achievement("streak-7", AchievementCriteria::DailyStreak, 7, 10),
    ] {
        engine.define_achievement(&a).await.unwrap();
    }
    assert_eq!(engine.list_achievements().await.unwrap().len(), 4);

    let unlocked = engine
        .check_and_unlock("bob", AchievementCriteria::PostsCreated, 12)
        .await
        .unwrap();
    let ids: Vec<&str> = unlocked.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["posts-1", "posts-10"]);

    // Zero reward writes no Aura entry
    let aura = AuraService::new(&env.ctx);
    assert_eq!(aura.get_points("bob").await.unwrap(), 5);
    assert_eq!(aura.get_history("bob", 10, 0).await.unwrap().len(), 1);

    // Other users unaffected
    assert!(engine.list_unlocked("carol").await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checks_unlock_once() {
    let env = TestEnv::new().await;
    AchievementEngine::new(&env.ctx)
        .define_achievement(&achievement("aura-100", AchievementCriteria::AuraEarned, 100, 10))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..6 {
        let ctx = env.ctx.clone();
        handles.push(tokio::spawn(async move {
            AchievementEngine::new(&ctx)
                .check_and_unlock("alice", AchievementCriteria::AuraEarned, 150)
                .await
                .unwrap()
                .len()
        }));
    }
    let mut total = 0;
    for handle in handles {
        total += handle.await.unwrap();
    }

    assert_eq!(total, 1);
    assert_eq!(AuraService::new(&env.ctx).get_points("alice").await.unwrap(), 10);
}

#[tokio::test]
async fn test_refresh_with_provider() {
    let env = TestEnv::new().await;
    let engine = AchievementEngine::new(&env.ctx);
    engine
        .define_achievement(&achievement("solver-3", AchievementCriteria::ProblemSolved, 3, 0))
        .await
        .unwrap();

    let unlocked = engine
        .refresh_and_unlock(&FixedCounter(3), "alice", AchievementCriteria::ProblemSolved)
        .await
        .unwrap();
    assert_eq!(unlocked.len(), 1);
}

#[tokio::test]
async fn test_sql_counter_provider() {
    let env = TestEnv::new().await;
    let provider = SqlCounterProvider::new(env.db.pool().clone());
    let engine = AchievementEngine::new(&env.ctx);

    env.post("p-1", "alice").await;
    env.post("p-2", "alice").await;
    env.comment("c-1", "p-1", "bob").await;
    BountyEscrow::new(&env.ctx)
        .create_question("alice", NewQuestion::new("q-1", "Help", 0))
        .await
        .unwrap();
    env.comment("a-1", "q-1", "bob").await;
    BountyEscrow::new(&env.ctx)
        .accept_answer("q-1", "a-1", "alice")
        .await
        .unwrap();

    for (user, criteria, expected) in [
        ("bob", AchievementCriteria::CommentsCreated, 2),
        ("bob", AchievementCriteria::AnswersAccepted, 1),
        ("bob", AchievementCriteria::AuraEarned, 15),
        ("alice", AchievementCriteria::PostsCreated, 3),
    ] {
        let value = engine.get_user_count(&provider, user, criteria).await.unwrap();
        assert_eq!(value, expected, "{user} {criteria}");
    }

    let err = engine
        .get_user_count(&provider, "bob", AchievementCriteria::DailyStreak)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BusinessError::UnsupportedCriteria(AchievementCriteria::DailyStreak)
    ));

    engine
        .define_achievement(&achievement("helper-1", AchievementCriteria::AnswersAccepted, 1, 5))
        .await
        .unwrap();
    let unlocked = engine
        .refresh_and_unlock(&provider, "bob", AchievementCriteria::AnswersAccepted)
        .await
        .unwrap();
    assert_eq!(unlocked.len(), 1);
    assert_eq!(AuraService::new(&env.ctx).get_points("bob").await.unwrap(), 20);
}

#[tokio::test]
async fn test_spawned_check() {
    let env = TestEnv::new().await;
    let engine = AchievementEngine::new(&env.ctx);
    engine
        .define_achievement(&achievement("posts-1", AchievementCriteria::PostsCreated, 1, 2))
        .await
        .unwrap();

    engine
        .spawn_check("alice", AchievementCriteria::PostsCreated, 1)
        .await
        .unwrap();

    assert_eq!(engine.list_unlocked("alice").await.unwrap().len(), 1);
    assert_eq!(AuraService::new(&env.ctx).get_points("alice").await.unwrap(), 2);
}
