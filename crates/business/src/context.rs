//! Service context shared by all economy services

use crate::config::EconomyConfig;
use crate::notify::NotificationDispatcher;
use repbank_persistence::Database;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Context for economy operations - database access, config, notifications.
///
/// Cheap to clone; background tasks take an owned copy.
#[derive(Clone)]
pub struct EconomyContext {
    pool: SqlitePool,
    config: Arc<EconomyConfig>,
    notifications: NotificationDispatcher,
}

impl EconomyContext {
    pub fn new(db: &Database, config: EconomyConfig, notifications: NotificationDispatcher) -> Self {
        Self::from_parts(db.pool().clone(), config, notifications)
    }

    pub fn from_parts(
        pool: SqlitePool,
        config: EconomyConfig,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            notifications,
        }
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn notifications(&self) -> &NotificationDispatcher {
        &self.notifications
    }
}
