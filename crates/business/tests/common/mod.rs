//! Shared setup for business integration tests

#![allow(dead_code)]

use repbank_business::{
    ChannelNotifier, EconomyConfig, EconomyContext, NotificationDispatcher,
};
use repbank_core::Notification;
use repbank_persistence::{CommentRepo, CommentRow, Database, PostRepo, PostRow, PostType};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;

pub struct TestEnv {
    _dir: TempDir,
    pub db: Database,
    pub ctx: EconomyContext,
    notifications: Mutex<UnboundedReceiver<Notification>>,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_config(EconomyConfig::default()).await
    }

    pub async fn with_config(config: EconomyConfig) -> Self {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("test.db")).await.unwrap();
        let (notifier, notifications) = ChannelNotifier::new();
        let ctx = EconomyContext::new(&db, config, NotificationDispatcher::new(Arc::new(notifier)));
        Self {
            _dir: dir,
            db,
            ctx,
            notifications: Mutex::new(notifications),
        }
    }

    pub async fn post(&self, id: &str, author: &str) {
        PostRepo::insert(self.db.pool(), &PostRow::new(id, author, PostType::Post, "post"))
            .await
            .unwrap();
    }

    pub async fn comment(&self, id: &str, post_id: &str, author: &str) {
        CommentRepo::insert(self.db.pool(), &CommentRow::new(id, post_id, author, "body"))
            .await
            .unwrap();
    }

    pub async fn reply(&self, id: &str, post_id: &str, parent_id: &str, author: &str) {
        let row = CommentRow::new(id, post_id, author, "reply").reply_to(parent_id);
        CommentRepo::insert(self.db.pool(), &row).await.unwrap();
    }

    /// Every later insert into `aura_ledger` aborts
    pub async fn break_aura_ledger(&self) {
        sqlx::query(
            "CREATE TRIGGER aura_ledger_down BEFORE INSERT ON aura_ledger \
             BEGIN SELECT RAISE(ABORT, 'aura ledger unavailable'); END",
        )
        .execute(self.db.pool())
        .await
        .unwrap();
    }

    /// Next notification, or `None` if nothing arrives shortly
    pub async fn next_notification(&self) -> Option<Notification> {
        let mut rx = self.notifications.lock().await;
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .ok()
            .flatten()
    }
}
