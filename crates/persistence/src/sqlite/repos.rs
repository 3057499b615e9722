//! Repository implementations cho ledgers và Cipher balance projection
//!
//! Ledger rows chỉ được INSERT, không bao giờ UPDATE/DELETE.

use crate::error::PersistenceResult;
use crate::sqlite::schema::*;
use chrono::Utc;
use repbank_core::{CurrencyKind, LedgerEntry, LedgerReason};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

fn ledger_table(currency: CurrencyKind) -> &'static str {
    match currency {
        CurrencyKind::Aura => "aura_ledger",
        CurrencyKind::Cipher => "cipher_ledger",
    }
}

// ============================================================================
// Ledger Repository
// ============================================================================

/// Repository cho `aura_ledger` / `cipher_ledger`.
///
/// Bảng được chọn theo `R::CURRENCY` của reason type.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Ghi một entry
    pub async fn insert<'e, E, R>(executor: E, entry: &LedgerEntry<R>) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
        R: LedgerReason,
    {
        let sql = format!(
            "INSERT INTO {} (id, user_id, amount, reason, source_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
            ledger_table(R::CURRENCY)
        );
        sqlx::query(&sql)
            .bind(&entry.id)
            .bind(&entry.user_id)
            .bind(entry.amount)
            .bind(entry.reason.as_str())
            .bind(&entry.source_id)
            .bind(entry.created_at)
            .execute(executor)
            .await?;

        debug!(
            currency = %R::CURRENCY,
            user_id = %entry.user_id,
            amount = entry.amount,
            reason = %entry.reason,
            "Ledger entry written"
        );
        Ok(())
    }

    /// Ghi entry nếu chưa tồn tại entry cùng key `(user_id, reason, source_id)`.
    ///
    /// Trả về `false` khi key đã tồn tại (không ghi gì). Chỉ các key có unique
    /// index mới được dedupe: Cipher awards dương và Aura `ANSWER_ACCEPTED`.
    pub async fn insert_keyed<'e, E, R>(
        executor: E,
        entry: &LedgerEntry<R>,
    ) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
        R: LedgerReason,
    {
        let sql = format!(
            "INSERT INTO {} (id, user_id, amount, reason, source_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) ON CONFLICT DO NOTHING",
            ledger_table(R::CURRENCY)
        );
        let result = sqlx::query(&sql)
            .bind(&entry.id)
            .bind(&entry.user_id)
            .bind(entry.amount)
            .bind(entry.reason.as_str())
            .bind(&entry.source_id)
            .bind(entry.created_at)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Tổng amount của user; 0 nếu chưa có entry
    pub async fn sum_for_user<'e, E>(
        executor: E,
        currency: CurrencyKind,
        user_id: &str,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "SELECT COALESCE(SUM(amount), 0) FROM {} WHERE user_id = ?",
            ledger_table(currency)
        );
        let row: (i64,) = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Đếm entries của user
    pub async fn count_for_user<'e, E>(
        executor: E,
        currency: CurrencyKind,
        user_id: &str,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE user_id = ?",
            ledger_table(currency)
        );
        let row: (i64,) = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Lịch sử entries, mới nhất trước
    pub async fn history<'e, E, R>(
        executor: E,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> PersistenceResult<Vec<LedgerEntry<R>>>
    where
        E: Executor<'e, Database = Sqlite>,
        R: LedgerReason,
    {
        let sql = format!(
            "SELECT id, user_id, amount, reason, source_id, created_at FROM {} \
             WHERE user_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
            ledger_table(R::CURRENCY)
        );
        let rows = sqlx::query_as::<_, LedgerRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await?;

        rows.into_iter().map(|row| row.into_entry::<R>()).collect()
    }

    /// Users có entry trong ledger (phục vụ audit)
    pub async fn users<'e, E>(executor: E, currency: CurrencyKind) -> PersistenceResult<Vec<String>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "SELECT DISTINCT user_id FROM {} ORDER BY user_id",
            ledger_table(currency)
        );
        let rows: Vec<(String,)> = sqlx::query_as(&sql).fetch_all(executor).await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}

// ============================================================================
// Cipher Account Repository (balance projection)
// ============================================================================

/// Repository cho `cipher_accounts`.
///
/// Projection phải luôn bằng `SUM(cipher_ledger.amount)`; mọi thay đổi
/// balance đi cùng một ledger insert trong cùng transaction.
pub struct CipherAccountRepo;

impl CipherAccountRepo {
    /// Lấy account row
    pub async fn get<'e, E>(executor: E, user_id: &str) -> PersistenceResult<Option<CipherAccountRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, CipherAccountRow>(
            "SELECT user_id, balance, updated_at FROM cipher_accounts WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Balance hiện tại; 0 nếu chưa có account
    pub async fn balance<'e, E>(executor: E, user_id: &str) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT balance FROM cipher_accounts WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(executor)
                .await?;
        Ok(row.map(|r| r.0).unwrap_or(0))
    }

    /// Credit (cộng) vào balance, tạo account nếu chưa có
    pub async fn credit<'e, E>(executor: E, user_id: &str, amount: i64) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO cipher_accounts (user_id, balance, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                balance = balance + excluded.balance,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(Utc::now())
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Debit (trừ) nếu đủ tiền, trong một UPDATE có điều kiện.
    ///
    /// Trả về `false` khi balance < amount hoặc chưa có account.
    pub async fn try_debit<'e, E>(executor: E, user_id: &str, amount: i64) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE cipher_accounts
            SET balance = balance - ?, updated_at = ?
            WHERE user_id = ? AND balance >= ?
            "#,
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(user_id)
        .bind(amount)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Khởi tạo database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(10))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Chạy migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Tạo database mới với schema
pub async fn init_database(database_url: &str, max_connections: u32) -> PersistenceResult<SqlitePool> {
    let pool = create_pool(database_url, max_connections).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}
