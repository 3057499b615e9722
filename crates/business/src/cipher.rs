//! Cipher Service - spendable currency
//!
//! Mỗi thay đổi balance là một cặp (ledger insert, projection update) trong
//! cùng một transaction. Spend là một UPDATE có điều kiện `balance >= amount`
//! nên hai spend đồng thời không thể cùng thành công khi không đủ tiền.

use crate::context::EconomyContext;
use crate::error::{BusinessError, BusinessResult};
use repbank_core::{CipherReason, CurrencyKind, LedgerEntry};
use repbank_persistence::{CipherAccountRepo, LedgerRepo};
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{info, warn};

/// Kết quả so sánh projection với ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionCheck {
    pub user_id: String,
    pub projected: i64,
    pub ledger_sum: i64,
}

impl ProjectionCheck {
    pub fn is_consistent(&self) -> bool {
        self.projected == self.ledger_sum
    }
}

/// Cipher Service - award, spend, balance, history, audit
pub struct CipherService<'a> {
    ctx: &'a EconomyContext,
}

impl<'a> CipherService<'a> {
    pub fn new(ctx: &'a EconomyContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Award Cipher trong transaction riêng.
    ///
    /// Với `source_id`, award là idempotent theo `(user_id, reason, source_id)`:
    /// lần gọi lặp lại trả về `Ok(None)` và không đổi balance.
    pub async fn award(
        &self,
        user_id: &str,
        amount: i64,
        reason: CipherReason,
        source_id: Option<&str>,
    ) -> BusinessResult<Option<LedgerEntry<CipherReason>>> {
        let mut tx = self.ctx.pool().begin().await?;
        let entry = Self::award_in(&mut tx, user_id, amount, reason, source_id).await?;
        tx.commit().await?;

        if let Some(entry) = &entry {
            info!(user_id, amount, %reason, source_id, entry_id = %entry.id, "Cipher awarded");
        }
        Ok(entry)
    }

    /// Award trong transaction của caller
    pub async fn award_in(
        conn: &mut SqliteConnection,
        user_id: &str,
        amount: i64,
        reason: CipherReason,
        source_id: Option<&str>,
    ) -> BusinessResult<Option<LedgerEntry<CipherReason>>> {
        if amount <= 0 {
            return Err(BusinessError::InvalidAmount(format!(
                "Cipher award must be positive: {amount}"
            )));
        }

        let entry = LedgerEntry::new(user_id, amount, reason, source_id)?;
        if source_id.is_some() {
            if !LedgerRepo::insert_keyed(&mut *conn, &entry).await? {
                warn!(user_id, %reason, source_id, "Duplicate Cipher award skipped");
                return Ok(None);
            }
        } else {
            LedgerRepo::insert(&mut *conn, &entry).await?;
        }
        CipherAccountRepo::credit(&mut *conn, user_id, amount).await?;

        Ok(Some(entry))
    }

    /// Spend Cipher trong transaction riêng
    pub async fn spend(
        &self,
        user_id: &str,
        amount: i64,
        reason: CipherReason,
        source_id: Option<&str>,
    ) -> BusinessResult<LedgerEntry<CipherReason>> {
        let mut tx = self.ctx.pool().begin().await?;
        let entry = Self::spend_in(&mut tx, user_id, amount, reason, source_id).await?;
        tx.commit().await?;

        info!(user_id, amount, %reason, source_id, entry_id = %entry.id, "Cipher spent");
        Ok(entry)
    }

    /// Spend trong transaction của caller.
    ///
    /// Debit là statement ghi đầu tiên nên giữ write lock tới commit.
    pub async fn spend_in(
        conn: &mut SqliteConnection,
        user_id: &str,
        amount: i64,
        reason: CipherReason,
        source_id: Option<&str>,
    ) -> BusinessResult<LedgerEntry<CipherReason>> {
        if amount <= 0 {
            return Err(BusinessError::InvalidAmount(format!(
                "Cipher spend must be positive: {amount}"
            )));
        }

        if !CipherAccountRepo::try_debit(&mut *conn, user_id, amount).await? {
            let available = CipherAccountRepo::balance(&mut *conn, user_id).await?;
            return Err(BusinessError::insufficient_funds(amount, available));
        }

        let entry = LedgerEntry::new(user_id, -amount, reason, source_id)?;
        LedgerRepo::insert(&mut *conn, &entry).await?;
        Ok(entry)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Balance từ projection; 0 nếu chưa có account
    pub async fn get_balance(&self, user_id: &str) -> BusinessResult<i64> {
        Ok(CipherAccountRepo::balance(self.ctx.pool(), user_id).await?)
    }

    /// Lịch sử Cipher, mới nhất trước
    pub async fn get_history(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> BusinessResult<Vec<LedgerEntry<CipherReason>>> {
        let (limit, offset) = self.ctx.config().page(limit, offset);
        Ok(LedgerRepo::history(self.ctx.pool(), user_id, limit, offset).await?)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// So sánh projection với `SUM(cipher_ledger.amount)` cho một user
    pub async fn verify_projection(&self, user_id: &str) -> BusinessResult<ProjectionCheck> {
        let mut tx = self.ctx.pool().begin().await?;
        let projected = CipherAccountRepo::balance(&mut *tx, user_id).await?;
        let ledger_sum = LedgerRepo::sum_for_user(&mut *tx, CurrencyKind::Cipher, user_id).await?;
        tx.commit().await?;

        let check = ProjectionCheck {
            user_id: user_id.to_string(),
            projected,
            ledger_sum,
        };
        if !check.is_consistent() {
            warn!(user_id, projected, ledger_sum, "Cipher projection drift");
        }
        Ok(check)
    }

    /// Kiểm tra tất cả users có Cipher ledger entries
    pub async fn audit_all(&self) -> BusinessResult<Vec<ProjectionCheck>> {
        let users = LedgerRepo::users(self.ctx.pool(), CurrencyKind::Cipher).await?;
        let mut checks = Vec::with_capacity(users.len());
        for user_id in users {
            checks.push(self.verify_projection(&user_id).await?);
        }
        Ok(checks)
    }
}
