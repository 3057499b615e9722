//! # Repbank Persistence
//!
//! Persistence layer cho Repbank economy engine - SQLite qua sqlx.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Database                             │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌──────────────┐  │
//! │  │   Ledgers    │   │ cipher_accounts  │   │   Content    │  │
//! │  │ (append-only)│   │   (projection)   │   │ votes/bounty │  │
//! │  └──────────────┘   └──────────────────┘   └──────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use repbank_persistence::{Database, LedgerRepo};
//!
//! let db = Database::open("data/repbank.db").await?;
//! let aura = LedgerRepo::sum_for_user(db.pool(), CurrencyKind::Aura, "alice").await?;
//!
//! // Multi-row writes share one transaction
//! let mut tx = db.pool().begin().await?;
//! CipherAccountRepo::credit(&mut *tx, "alice", 10).await?;
//! LedgerRepo::insert(&mut *tx, &entry).await?;
//! tx.commit().await?;
//! ```

pub mod error;
pub mod sqlite;

pub use error::{is_unique_violation, PersistenceError, PersistenceResult};
pub use sqlite::schema::{
    AchievementRow, CipherAccountRow, CommentRow, LedgerRow, PostRow, PostType, UnlockedRow,
};
pub use sqlite::{
    create_pool, init_database, run_migrations, AchievementRepo, CipherAccountRepo, CommentRepo,
    LedgerRepo, PostRepo, VoteRepo,
};

use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Default pool size cho file database
pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Database facade - pool đã chạy migrations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Mở (hoặc tạo) database file và chạy migrations
    pub async fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PersistenceError::Configuration(format!(
                        "cannot create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        let url = format!("sqlite:{}", path.display());
        Self::connect(&url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Kết nối bằng URL (e.g., "sqlite:data/repbank.db")
    pub async fn connect(db_url: &str, max_connections: u32) -> PersistenceResult<Self> {
        let pool = init_database(db_url, max_connections).await?;
        info!(db_url, max_connections, "Database ready");
        Ok(Self { pool })
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
