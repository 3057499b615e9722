//! Content accessors cho posts, comments và votes
//!
//! Engine chỉ đọc author/bounty fields và ghi vote counters, bounty fields.
//! Các cột khác của content thuộc về platform collaborators.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use chrono::Utc;
use repbank_core::{TargetKind, VoteType};
use sqlx::{Executor, Sqlite};

// ============================================================================
// Post Repository
// ============================================================================

/// Repository cho posts table
pub struct PostRepo;

impl PostRepo {
    /// Thêm post mới
    pub async fn insert<'e, E>(executor: E, post: &PostRow) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, post_type, title, upvotes, downvotes,
                               bounty_amount, is_bounty_paid, accepted_answer_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.post_type)
        .bind(&post.title)
        .bind(post.upvotes)
        .bind(post.downvotes)
        .bind(post.bounty_amount)
        .bind(post.is_bounty_paid)
        .bind(&post.accepted_answer_id)
        .bind(post.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Lấy post theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: &str) -> PersistenceResult<Option<PostRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, PostRow>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    /// Write lock trên post row (xem `VoteRepo::lock_target`)
    pub async fn lock<'e, E>(executor: E, id: &str) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE posts SET accepted_answer_id = accepted_answer_id WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Set hoặc xóa accepted answer. Trả về `false` nếu post không tồn tại.
    pub async fn set_accepted_answer<'e, E>(
        executor: E,
        id: &str,
        answer_id: Option<&str>,
    ) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE posts SET accepted_answer_id = ? WHERE id = ?")
            .bind(answer_id)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Đánh dấu bounty đã trả; chỉ chuyển false -> true một lần.
    ///
    /// Trả về `true` nếu lần gọi này là lần chuyển trạng thái.
    pub async fn mark_bounty_paid<'e, E>(executor: E, id: &str) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE posts SET is_bounty_paid = 1 WHERE id = ? AND is_bounty_paid = 0 AND bounty_amount > 0",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Đếm posts của author
    pub async fn count_by_author<'e, E>(executor: E, author_id: &str) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Đếm số answers của user đang được chấp nhận
    pub async fn count_accepted_answers<'e, E>(executor: E, author_id: &str) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM posts p
            JOIN comments c ON c.id = p.accepted_answer_id
            WHERE c.author_id = ?
            "#,
        )
        .bind(author_id)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Comment Repository
// ============================================================================

/// Repository cho comments table
pub struct CommentRepo;

impl CommentRepo {
    /// Thêm comment mới
    pub async fn insert<'e, E>(executor: E, comment: &CommentRow) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, parent_id, author_id, body, upvotes, downvotes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&comment.id)
        .bind(&comment.post_id)
        .bind(&comment.parent_id)
        .bind(&comment.author_id)
        .bind(&comment.body)
        .bind(comment.upvotes)
        .bind(comment.downvotes)
        .bind(comment.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Lấy comment theo ID
    pub async fn get_by_id<'e, E>(executor: E, id: &str) -> PersistenceResult<Option<CommentRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, CommentRow>("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    /// Đếm comments của author
    pub async fn count_by_author<'e, E>(executor: E, author_id: &str) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Vote Repository
// ============================================================================

fn target_table(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Post => "posts",
        TargetKind::Comment => "comments",
    }
}

/// (vote table, target column)
fn vote_table(kind: TargetKind) -> (&'static str, &'static str) {
    match kind {
        TargetKind::Post => ("post_votes", "post_id"),
        TargetKind::Comment => ("comment_votes", "comment_id"),
    }
}

/// Repository cho `post_votes` / `comment_votes` và vote counters trên target.
pub struct VoteRepo;

impl VoteRepo {
    /// Lấy write lock trên target row bằng một UPDATE no-op.
    ///
    /// SQLite không có `SELECT ... FOR UPDATE`; statement ghi đầu tiên của
    /// transaction giữ write lock tới khi commit/rollback. Trả về `false`
    /// nếu target không tồn tại.
    pub async fn lock_target<'e, E>(executor: E, kind: TargetKind, target_id: &str) -> PersistenceResult<bool>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "UPDATE {} SET upvotes = upvotes WHERE id = ?",
            target_table(kind)
        );
        let result = sqlx::query(&sql).bind(target_id).execute(executor).await?;
        Ok(result.rows_affected() == 1)
    }

    /// Author của target
    pub async fn target_author<'e, E>(
        executor: E,
        kind: TargetKind,
        target_id: &str,
    ) -> PersistenceResult<Option<String>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("SELECT author_id FROM {} WHERE id = ?", target_table(kind));
        let row: Option<(String,)> = sqlx::query_as(&sql)
            .bind(target_id)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(|r| r.0))
    }

    /// (upvotes, downvotes) denormalized trên target
    pub async fn target_counts<'e, E>(
        executor: E,
        kind: TargetKind,
        target_id: &str,
    ) -> PersistenceResult<Option<(i64, i64)>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "SELECT upvotes, downvotes FROM {} WHERE id = ?",
            target_table(kind)
        );
        let row: Option<(i64, i64)> = sqlx::query_as(&sql)
            .bind(target_id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    /// Cộng delta vào vote counters
    pub async fn adjust_counts<'e, E>(
        executor: E,
        kind: TargetKind,
        target_id: &str,
        upvotes_delta: i64,
        downvotes_delta: i64,
    ) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "UPDATE {} SET upvotes = upvotes + ?, downvotes = downvotes + ? WHERE id = ?",
            target_table(kind)
        );
        sqlx::query(&sql)
            .bind(upvotes_delta)
            .bind(downvotes_delta)
            .bind(target_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Vote hiện tại của user trên target
    pub async fn get<'e, E>(
        executor: E,
        kind: TargetKind,
        target_id: &str,
        user_id: &str,
    ) -> PersistenceResult<Option<VoteType>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (table, column) = vote_table(kind);
        let sql = format!("SELECT vote_type FROM {table} WHERE {column} = ? AND user_id = ?");
        let row: Option<(String,)> = sqlx::query_as(&sql)
            .bind(target_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await?;

        row.map(|(value,)| {
            value
                .parse::<VoteType>()
                .map_err(|_| PersistenceError::invalid_enum("vote_type", &value))
        })
        .transpose()
    }

    /// Insert hoặc đổi hướng vote
    pub async fn upsert<'e, E>(
        executor: E,
        kind: TargetKind,
        target_id: &str,
        user_id: &str,
        vote_type: VoteType,
    ) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (table, column) = vote_table(kind);
        let sql = format!(
            "INSERT INTO {table} ({column}, user_id, vote_type, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT({column}, user_id) DO UPDATE SET \
                 vote_type = excluded.vote_type, updated_at = excluded.updated_at"
        );
        let now = Utc::now();
        sqlx::query(&sql)
            .bind(target_id)
            .bind(user_id)
            .bind(vote_type.as_str())
            .bind(now)
            .bind(now)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Xóa vote (trạng thái NONE)
    pub async fn delete<'e, E>(
        executor: E,
        kind: TargetKind,
        target_id: &str,
        user_id: &str,
    ) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (table, column) = vote_table(kind);
        let sql = format!("DELETE FROM {table} WHERE {column} = ? AND user_id = ?");
        sqlx::query(&sql)
            .bind(target_id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Đếm vote rows theo hướng: (up, down)
    pub async fn tally<'e, E>(executor: E, kind: TargetKind, target_id: &str) -> PersistenceResult<(i64, i64)>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (table, column) = vote_table(kind);
        let sql = format!(
            "SELECT \
                 COALESCE(SUM(CASE WHEN vote_type = 'UP' THEN 1 ELSE 0 END), 0), \
                 COALESCE(SUM(CASE WHEN vote_type = 'DOWN' THEN 1 ELSE 0 END), 0) \
             FROM {table} WHERE {column} = ?"
        );
        let row: (i64, i64) = sqlx::query_as(&sql)
            .bind(target_id)
            .fetch_one(executor)
            .await?;
        Ok(row)
    }

    /// Số vote rows của một user trên target (tối đa 1)
    pub async fn rows_for_voter<'e, E>(
        executor: E,
        kind: TargetKind,
        target_id: &str,
        user_id: &str,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (table, column) = vote_table(kind);
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column} = ? AND user_id = ?");
        let row: (i64,) = sqlx::query_as(&sql)
            .bind(target_id)
            .bind(user_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}
