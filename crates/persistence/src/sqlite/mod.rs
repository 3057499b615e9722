//! SQLite persistence module
//!
//! Repository pattern cho SQLite database access. Mọi repo function nhận một
//! `Executor` để chạy được trên pool hoặc bên trong transaction (`&mut *tx`).

pub mod achievements;
pub mod content;
pub mod repos;
pub mod schema;

pub use achievements::AchievementRepo;
pub use content::{CommentRepo, PostRepo, VoteRepo};
pub use repos::{create_pool, init_database, run_migrations, CipherAccountRepo, LedgerRepo};
pub use schema::{
    AchievementRow, CipherAccountRow, CommentRow, LedgerRow, PostRow, PostType, UnlockedRow,
};
