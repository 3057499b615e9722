//! Aura Service - reputation ledger
//!
//! Aura không có projection: balance luôn là `SUM(amount)` trên `aura_ledger`.
//! Có thể âm.

use crate::context::EconomyContext;
use crate::error::BusinessResult;
use repbank_core::{AuraReason, CurrencyKind, LedgerEntry};
use repbank_persistence::LedgerRepo;
use tracing::{debug, warn};

/// Aura Service - award, points, history
pub struct AuraService<'a> {
    ctx: &'a EconomyContext,
}

impl<'a> AuraService<'a> {
    pub fn new(ctx: &'a EconomyContext) -> Self {
        Self { ctx }
    }

    /// Award Aura (positive amounts only).
    ///
    /// `amount <= 0` ghi log warning và không ghi entry (`Ok(None)`).
    pub async fn award(
        &self,
        user_id: &str,
        amount: i64,
        reason: AuraReason,
        source_id: Option<&str>,
    ) -> BusinessResult<Option<LedgerEntry<AuraReason>>> {
        if amount <= 0 {
            warn!(user_id, amount, %reason, "Ignoring non-positive Aura award");
            return Ok(None);
        }
        self.apply_delta(user_id, amount, reason, source_id).await
    }

    /// Award một lần cho key `(user_id, reason, source_id)`.
    ///
    /// Key phải có unique index trên `aura_ledger`; trả về `None` nếu đã ghi trước đó.
    pub(crate) async fn award_once(
        &self,
        user_id: &str,
        amount: i64,
        reason: AuraReason,
        source_id: &str,
    ) -> BusinessResult<Option<LedgerEntry<AuraReason>>> {
        if amount <= 0 {
            warn!(user_id, amount, %reason, "Ignoring non-positive Aura award");
            return Ok(None);
        }

        let entry = LedgerEntry::new(user_id, amount, reason, Some(source_id))?;
        if !LedgerRepo::insert_keyed(self.ctx.pool(), &entry).await? {
            debug!(user_id, %reason, source_id, "Keyed Aura award already written");
            return Ok(None);
        }

        debug!(user_id, amount, %reason, source_id, "Aura applied");
        Ok(Some(entry))
    }

    /// Ghi một delta bất kỳ dấu (vote reversals dùng delta âm). Delta 0 bị bỏ qua.
    pub(crate) async fn apply_delta(
        &self,
        user_id: &str,
        delta: i64,
        reason: AuraReason,
        source_id: Option<&str>,
    ) -> BusinessResult<Option<LedgerEntry<AuraReason>>> {
        if delta == 0 {
            return Ok(None);
        }

        let entry = LedgerEntry::new(user_id, delta, reason, source_id)?;
        LedgerRepo::insert(self.ctx.pool(), &entry).await?;

        debug!(user_id, delta, %reason, source_id, "Aura applied");
        Ok(Some(entry))
    }

    /// Tổng Aura của user; 0 nếu chưa có entry
    pub async fn get_points(&self, user_id: &str) -> BusinessResult<i64> {
        let points = LedgerRepo::sum_for_user(self.ctx.pool(), CurrencyKind::Aura, user_id).await?;
        Ok(points)
    }

    /// Lịch sử Aura, mới nhất trước. `limit` bị giới hạn bởi config.
    pub async fn get_history(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> BusinessResult<Vec<LedgerEntry<AuraReason>>> {
        let (limit, offset) = self.ctx.config().page(limit, offset);
        let entries = LedgerRepo::history(self.ctx.pool(), user_id, limit, offset).await?;
        Ok(entries)
    }
}
