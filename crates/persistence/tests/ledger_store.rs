//! Integration tests for the SQLite ledger store and content accessors
//!
//! Each test opens a fresh file-backed database in a temp directory.

use chrono::Utc;
use repbank_core::{
    Achievement, AchievementCriteria, AuraReason, CipherReason, CurrencyKind, LedgerEntry,
    TargetKind, VoteType,
};
use repbank_persistence::{
    AchievementRepo, CipherAccountRepo, CommentRepo, CommentRow, Database, LedgerRepo, PostRepo,
    PostRow, PostType, VoteRepo,
};
use tempfile::TempDir;

async fn open_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db = Database::open(dir.path().join("test.db")).await.unwrap();
    (dir, db)
}

fn aura(user: &str, amount: i64, source: Option<&str>) -> LedgerEntry<AuraReason> {
    LedgerEntry::new(user, amount, AuraReason::PostVote, source).unwrap()
}

fn cipher(user: &str, amount: i64, reason: CipherReason, source: Option<&str>) -> LedgerEntry<CipherReason> {
    LedgerEntry::new(user, amount, reason, source).unwrap()
}

// ============================================================================
// Ledger
// ============================================================================

#[tokio::test]
async fn test_sum_is_zero_without_entries() {
    let (_dir, db) = open_db().await;

    let sum = LedgerRepo::sum_for_user(db.pool(), CurrencyKind::Aura, "nobody")
        .await
        .unwrap();
    assert_eq!(sum, 0);
    assert_eq!(CipherAccountRepo::balance(db.pool(), "nobody").await.unwrap(), 0);
}

#[tokio::test]
async fn test_aura_sum_and_history_newest_first() {
    let (_dir, db) = open_db().await;

    for amount in [5, -2, 5, 3] {
        LedgerRepo::insert(db.pool(), &aura("alice", amount, Some("p-1")))
            .await
            .unwrap();
    }
    LedgerRepo::insert(db.pool(), &aura("bob", 5, None)).await.unwrap();

    let sum = LedgerRepo::sum_for_user(db.pool(), CurrencyKind::Aura, "alice")
        .await
        .unwrap();
    assert_eq!(sum, 11);
    assert_eq!(
        LedgerRepo::count_for_user(db.pool(), CurrencyKind::Aura, "alice")
            .await
            .unwrap(),
        4
    );

    let history: Vec<LedgerEntry<AuraReason>> =
        LedgerRepo::history(db.pool(), "alice", 10, 0).await.unwrap();
    let amounts: Vec<i64> = history.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![3, 5, -2, 5]);
    assert!(history.iter().all(|e| e.reason == AuraReason::PostVote));

    let page: Vec<LedgerEntry<AuraReason>> =
        LedgerRepo::history(db.pool(), "alice", 2, 2).await.unwrap();
    let amounts: Vec<i64> = page.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![-2, 5]);
}

#[tokio::test]
async fn test_ledgers_are_separate() {
    let (_dir, db) = open_db().await;

    LedgerRepo::insert(db.pool(), &aura("alice", 5, None)).await.unwrap();
    LedgerRepo::insert(db.pool(), &cipher("alice", 7, CipherReason::AdminGrant, None))
        .await
        .unwrap();

    assert_eq!(
        LedgerRepo::sum_for_user(db.pool(), CurrencyKind::Aura, "alice").await.unwrap(),
        5
    );
    assert_eq!(
        LedgerRepo::sum_for_user(db.pool(), CurrencyKind::Cipher, "alice").await.unwrap(),
        7
    );
}

#[tokio::test]
async fn test_keyed_insert_is_at_most_once() {
    let (_dir, db) = open_db().await;

    let first = cipher("bob", 20, CipherReason::AnswerAccepted, Some("q-1"));
    let second = cipher("bob", 20, CipherReason::AnswerAccepted, Some("q-1"));

    assert!(LedgerRepo::insert_keyed(db.pool(), &first).await.unwrap());
    assert!(!LedgerRepo::insert_keyed(db.pool(), &second).await.unwrap());

    assert_eq!(
        LedgerRepo::count_for_user(db.pool(), CurrencyKind::Cipher, "bob").await.unwrap(),
        1
    );

    // Different reason or source is a different key
    let other = cipher("bob", 20, CipherReason::ContestPrize, Some("q-1"));
    assert!(LedgerRepo::insert_keyed(db.pool(), &other).await.unwrap());
}

#[tokio::test]
async fn test_aura_accept_bonus_key_is_unique() {
    let (_dir, db) = open_db().await;

    let bonus = || LedgerEntry::new("bob", 15, AuraReason::AnswerAccepted, Some("a-1")).unwrap();
    assert!(LedgerRepo::insert_keyed(db.pool(), &bonus()).await.unwrap());
    assert!(!LedgerRepo::insert_keyed(db.pool(), &bonus()).await.unwrap());

    // Vote deltas share a source id on purpose and stay unconstrained
    assert!(LedgerRepo::insert_keyed(db.pool(), &aura("bob", 5, Some("p-1"))).await.unwrap());
    assert!(LedgerRepo::insert_keyed(db.pool(), &aura("bob", 5, Some("p-1"))).await.unwrap());

    assert_eq!(
        LedgerRepo::sum_for_user(db.pool(), CurrencyKind::Aura, "bob").await.unwrap(),
        25
    );
}

#[tokio::test]
async fn test_spends_with_same_source_are_not_deduplicated() {
    let (_dir, db) = open_db().await;

    for _ in 0..2 {
        LedgerRepo::insert(
            db.pool(),
            &cipher("alice", -5, CipherReason::StorePurchase, Some("item-1")),
        )
        .await
        .unwrap();
    }
    assert_eq!(
        LedgerRepo::sum_for_user(db.pool(), CurrencyKind::Cipher, "alice").await.unwrap(),
        -10
    );
}

#[tokio::test]
async fn test_ledger_users() {
    let (_dir, db) = open_db().await;

    LedgerRepo::insert(db.pool(), &cipher("carol", 1, CipherReason::AdminGrant, None))
        .await
        .unwrap();
    LedgerRepo::insert(db.pool(), &cipher("alice", 1, CipherReason::AdminGrant, None))
        .await
        .unwrap();

    let users = LedgerRepo::users(db.pool(), CurrencyKind::Cipher).await.unwrap();
    assert_eq!(users, vec!["alice".to_string(), "carol".to_string()]);
    assert!(LedgerRepo::users(db.pool(), CurrencyKind::Aura).await.unwrap().is_empty());
}

// ============================================================================
// Cipher projection
// ============================================================================

#[tokio::test]
async fn test_credit_and_guarded_debit() {
    let (_dir, db) = open_db().await;

    CipherAccountRepo::credit(db.pool(), "alice", 100).await.unwrap();
    assert!(CipherAccountRepo::try_debit(db.pool(), "alice", 60).await.unwrap());
    assert!(!CipherAccountRepo::try_debit(db.pool(), "alice", 50).await.unwrap());
    assert_eq!(CipherAccountRepo::balance(db.pool(), "alice").await.unwrap(), 40);

    let account = CipherAccountRepo::get(db.pool(), "alice").await.unwrap().unwrap();
    assert_eq!(account.balance, 40);

    // No account row at all
    assert!(!CipherAccountRepo::try_debit(db.pool(), "ghost", 1).await.unwrap());
    assert!(CipherAccountRepo::get(db.pool(), "ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_ledger_and_projection_share_a_transaction() {
    let (_dir, db) = open_db().await;

    let entry = cipher("alice", 30, CipherReason::AdminGrant, None);
    {
        let mut tx = db.pool().begin().await.unwrap();
        LedgerRepo::insert(&mut *tx, &entry).await.unwrap();
        CipherAccountRepo::credit(&mut *tx, "alice", 30).await.unwrap();
        tx.rollback().await.unwrap();
    }

    assert_eq!(CipherAccountRepo::balance(db.pool(), "alice").await.unwrap(), 0);
    assert_eq!(
        LedgerRepo::sum_for_user(db.pool(), CurrencyKind::Cipher, "alice").await.unwrap(),
        0
    );
}

// ============================================================================
// Content and votes
// ============================================================================

#[tokio::test]
async fn test_post_and_comment_accessors() {
    let (_dir, db) = open_db().await;

    let question = PostRow::new("q-1", "alice", PostType::Question, "Lifetimes?").with_bounty(20);
    PostRepo::insert(db.pool(), &question).await.unwrap();
    PostRepo::insert(db.pool(), &PostRow::new("p-1", "alice", PostType::Post, "Hello"))
        .await
        .unwrap();

    let answer = CommentRow::new("a-1", "q-1", "bob", "Like this");
    CommentRepo::insert(db.pool(), &answer).await.unwrap();
    CommentRepo::insert(db.pool(), &CommentRow::new("r-1", "q-1", "carol", "+1").reply_to("a-1"))
        .await
        .unwrap();

    let loaded = PostRepo::get_by_id(db.pool(), "q-1").await.unwrap().unwrap();
    assert!(loaded.is_question());
    assert_eq!(loaded.kind().unwrap(), PostType::Question);
    assert_eq!(loaded.bounty().bounty_amount, 20);
    assert!(PostRepo::get_by_id(db.pool(), "missing").await.unwrap().is_none());

    let reply = CommentRepo::get_by_id(db.pool(), "r-1").await.unwrap().unwrap();
    assert!(!reply.is_top_level());

    assert_eq!(PostRepo::count_by_author(db.pool(), "alice").await.unwrap(), 2);
    assert_eq!(CommentRepo::count_by_author(db.pool(), "bob").await.unwrap(), 1);

    assert!(PostRepo::set_accepted_answer(db.pool(), "q-1", Some("a-1")).await.unwrap());
    assert_eq!(PostRepo::count_accepted_answers(db.pool(), "bob").await.unwrap(), 1);

    assert!(PostRepo::mark_bounty_paid(db.pool(), "q-1").await.unwrap());
    assert!(!PostRepo::mark_bounty_paid(db.pool(), "q-1").await.unwrap());
    // Plain post without bounty never flips
    assert!(!PostRepo::mark_bounty_paid(db.pool(), "p-1").await.unwrap());
}

#[tokio::test]
async fn test_vote_rows_and_counters() {
    let (_dir, db) = open_db().await;

    PostRepo::insert(db.pool(), &PostRow::new("p-1", "alice", PostType::Post, "Hello"))
        .await
        .unwrap();

    assert!(VoteRepo::lock_target(db.pool(), TargetKind::Post, "p-1").await.unwrap());
    assert!(!VoteRepo::lock_target(db.pool(), TargetKind::Post, "nope").await.unwrap());
    assert!(!VoteRepo::lock_target(db.pool(), TargetKind::Comment, "p-1").await.unwrap());

    assert_eq!(
        VoteRepo::target_author(db.pool(), TargetKind::Post, "p-1").await.unwrap(),
        Some("alice".to_string())
    );

    VoteRepo::upsert(db.pool(), TargetKind::Post, "p-1", "bob", VoteType::Up)
        .await
        .unwrap();
    VoteRepo::upsert(db.pool(), TargetKind::Post, "p-1", "bob", VoteType::Down)
        .await
        .unwrap();
    assert_eq!(
        VoteRepo::get(db.pool(), TargetKind::Post, "p-1", "bob").await.unwrap(),
        Some(VoteType::Down)
    );
    assert_eq!(
        VoteRepo::rows_for_voter(db.pool(), TargetKind::Post, "p-1", "bob").await.unwrap(),
        1
    );

    VoteRepo::adjust_counts(db.pool(), TargetKind::Post, "p-1", 0, 1).await.unwrap();
    assert_eq!(
        VoteRepo::target_counts(db.pool(), TargetKind::Post, "p-1").await.unwrap(),
        Some((0, 1))
    );
    assert_eq!(
        VoteRepo::tally(db.pool(), TargetKind::Post, "p-1").await.unwrap(),
        (0, 1)
    );

    VoteRepo::delete(db.pool(), TargetKind::Post, "p-1", "bob").await.unwrap();
    assert_eq!(
        VoteRepo::get(db.pool(), TargetKind::Post, "p-1", "bob").await.unwrap(),
        None
    );
}

// ============================================================================
// Achievements
// ============================================================================

#[tokio::test]
async fn test_achievement_catalog_and_unlocks() {
    let (_dir, db) = open_db().await;

    let five = Achievement::new("posts-5", "Writer", AchievementCriteria::PostsCreated, 5, 10)
        .unwrap()
        .with_description("Create five posts");
    let fifty = Achievement::new("posts-50", "Author", AchievementCriteria::PostsCreated, 50, 50)
        .unwrap();
    AchievementRepo::upsert(db.pool(), &five).await.unwrap();
    AchievementRepo::upsert(db.pool(), &fifty).await.unwrap();

    // Upsert replaces by id
    let renamed = Achievement { name: "Scribe".to_string(), ..five.clone() };
    AchievementRepo::upsert(db.pool(), &renamed).await.unwrap();

    let all = AchievementRepo::get_all(db.pool()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|a| a.name == "Scribe"));

    let reached = AchievementRepo::reached(db.pool(), AchievementCriteria::PostsCreated, 7)
        .await
        .unwrap();
    assert_eq!(reached.len(), 1);
    assert_eq!(reached[0].id, "posts-5");

    assert!(AchievementRepo::insert_unlock(db.pool(), "alice", "posts-5", Utc::now())
        .await
        .unwrap());
    assert!(!AchievementRepo::insert_unlock(db.pool(), "alice", "posts-5", Utc::now())
        .await
        .unwrap());
    assert_eq!(
        AchievementRepo::unlock_count(db.pool(), "alice", "posts-5").await.unwrap(),
        1
    );

    let unlocked = AchievementRepo::unlocked_by_user(db.pool(), "alice").await.unwrap();
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].0.id, "posts-5");
    assert_eq!(unlocked[0].1.user_id, "alice");
    assert_eq!(unlocked[0].1.achievement_id, "posts-5");
}
