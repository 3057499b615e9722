//! # Ledger Module
//!
//! Append-only ledger entries cho hai loại điểm: Aura và Cipher.
//! Balance của một user cho một currency = tổng `amount` của tất cả entries.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Loại điểm trong hệ thống.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyKind {
    /// Reputation, không tiêu được, không có materialized balance
    Aura,
    /// Currency tiêu được, có projection balance
    Cipher,
}

impl CurrencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyKind::Aura => "aura",
            CurrencyKind::Cipher => "cipher",
        }
    }
}

impl fmt::Display for CurrencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed reason code set belonging to exactly one currency.
///
/// The currency is part of the type, so an Aura reason can never be written
/// into the Cipher ledger and the Cipher idempotency key
/// `(user_id, reason, source_id)` stays type-safe.
pub trait LedgerReason:
    Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = CoreError> + Serialize + DeserializeOwned
    + Send + Sync + 'static
{
    const CURRENCY: CurrencyKind;

    fn as_str(&self) -> &'static str;
}

/// Lý do ghi nhận Aura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuraReason {
    /// Vote delta trên post
    PostVote,
    /// Vote delta trên comment
    CommentVote,
    /// Câu trả lời được chấp nhận
    AnswerAccepted,
    /// Mở khóa achievement
    AchievementUnlocked,
    /// Xếp hạng contest
    ContestPlacement,
    /// Admin cấp thủ công
    AdminGrant,
}

impl AuraReason {
    pub fn all() -> [AuraReason; 6] {
        [
            AuraReason::PostVote,
            AuraReason::CommentVote,
            AuraReason::AnswerAccepted,
            AuraReason::AchievementUnlocked,
            AuraReason::ContestPlacement,
            AuraReason::AdminGrant,
        ]
    }
}

impl LedgerReason for AuraReason {
    const CURRENCY: CurrencyKind = CurrencyKind::Aura;

    fn as_str(&self) -> &'static str {
        match self {
            AuraReason::PostVote => "POST_VOTE",
            AuraReason::CommentVote => "COMMENT_VOTE",
            AuraReason::AnswerAccepted => "ANSWER_ACCEPTED",
            AuraReason::AchievementUnlocked => "ACHIEVEMENT_UNLOCKED",
            AuraReason::ContestPlacement => "CONTEST_PLACEMENT",
            AuraReason::AdminGrant => "ADMIN_GRANT",
        }
    }
}

impl FromStr for AuraReason {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::all()
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::unknown("aura reason", s))
    }
}

impl fmt::Display for AuraReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lý do ghi nhận Cipher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CipherReason {
    /// Trừ tiền khi đặt bounty cho câu hỏi
    BountyCreated,
    /// Nhận bounty khi câu trả lời được chấp nhận
    AnswerAccepted,
    ContestEntry,
    ContestPrize,
    StorePurchase,
    AdminGrant,
}

impl CipherReason {
    pub fn all() -> [CipherReason; 6] {
        [
            CipherReason::BountyCreated,
            CipherReason::AnswerAccepted,
            CipherReason::ContestEntry,
            CipherReason::ContestPrize,
            CipherReason::StorePurchase,
            CipherReason::AdminGrant,
        ]
    }
}

impl LedgerReason for CipherReason {
    const CURRENCY: CurrencyKind = CurrencyKind::Cipher;

    fn as_str(&self) -> &'static str {
        match self {
            CipherReason::BountyCreated => "BOUNTY_CREATED",
            CipherReason::AnswerAccepted => "ANSWER_ACCEPTED",
            CipherReason::ContestEntry => "CONTEST_ENTRY",
            CipherReason::ContestPrize => "CONTEST_PRIZE",
            CipherReason::StorePurchase => "STORE_PURCHASE",
            CipherReason::AdminGrant => "ADMIN_GRANT",
        }
    }
}

impl FromStr for CipherReason {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::all()
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::unknown("cipher reason", s))
    }
}

impl fmt::Display for CipherReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Một dòng ledger - immutable sau khi ghi.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "R: LedgerReason")]
pub struct LedgerEntry<R: LedgerReason> {
    pub id: String,
    pub user_id: String,
    /// Signed, never zero
    pub amount: i64,
    pub reason: R,
    /// Correlation key (post id, contest id, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl<R: LedgerReason> LedgerEntry<R> {
    /// Tạo entry mới với id UUID v4 và timestamp hiện tại
    pub fn new(
        user_id: &str,
        amount: i64,
        reason: R,
        source_id: Option<&str>,
    ) -> CoreResult<Self> {
        if amount == 0 {
            return Err(CoreError::ZeroAmount);
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            amount,
            reason,
            source_id: source_id.map(str::to_string),
            created_at: Utc::now(),
        })
    }

    pub fn currency(&self) -> CurrencyKind {
        R::CURRENCY
    }

    pub fn is_credit(&self) -> bool {
        self.amount > 0
    }
}
