//! # Repbank Business
//!
//! Economy engine: Aura reputation, Cipher currency, vote rewards,
//! bounty escrow và achievement unlocks.
//!
//! ```rust,ignore
//! let ctx = EconomyContext::new(&db, EconomyConfig::default(), dispatcher);
//!
//! CipherService::new(&ctx).award("alice", 50, CipherReason::AdminGrant, None).await?;
//! let question = BountyEscrow::new(&ctx)
//!     .create_question("alice", NewQuestion::new("q-1", "Lifetimes?", 20))
//!     .await?;
//! VoteEngine::new(&ctx).vote(TargetKind::Post, "q-1", "bob", Some(VoteType::Up)).await?;
//! ```

pub mod achievement;
pub mod aura;
pub mod bounty;
pub mod cipher;
pub mod config;
pub mod context;
pub mod counters;
pub mod error;
pub mod notify;
pub mod vote;

pub use achievement::AchievementEngine;
pub use aura::AuraService;
pub use bounty::{AcceptOutcome, BountyEscrow, NewQuestion};
pub use cipher::{CipherService, ProjectionCheck};
pub use config::EconomyConfig;
pub use context::EconomyContext;
pub use counters::{CounterProvider, SqlCounterProvider};
pub use error::{BusinessError, BusinessResult};
pub use notify::{ChannelNotifier, LogNotifier, NotificationDispatcher, Notifier, NotifyError};
pub use vote::{VoteEngine, VoteOutcome};
