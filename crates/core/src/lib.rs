//! # Repbank Core
//!
//! Core domain types cho economy engine của community platform:
//! hai hệ điểm song song (Aura - reputation, Cipher - currency),
//! vote state machine, bounty state và achievement criteria.
//!
//! Crate này không có I/O. Persistence và services nằm ở các crate khác.

pub mod achievement;
pub mod bounty;
pub mod error;
pub mod ledger;
pub mod notification;
pub mod vote;

pub use achievement::{Achievement, AchievementCriteria, AchievementUnlock};
pub use bounty::{AcceptDecision, BountyState};
pub use error::{CoreError, CoreResult};
pub use ledger::{AuraReason, CipherReason, CurrencyKind, LedgerEntry, LedgerReason};
pub use notification::{Notification, NotificationKind};
pub use vote::{TargetKind, VotePoints, VoteTransition, VoteType};
