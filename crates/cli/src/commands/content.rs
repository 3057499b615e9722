//! Plain posts and comments
//!
//! Content belongs to the platform; these commands exist so the economy can be
//! driven end to end from the command line.

use anyhow::{Context, Result};
use repbank_persistence::{CommentRepo, CommentRow, Database, PostRepo, PostRow, PostType};

use crate::{CommentAction, PostAction};

pub async fn handle_post(database: &Database, action: PostAction) -> Result<()> {
    match action {
        PostAction::Create {
            post_id,
            author_id,
            title,
        } => {
            let row = PostRow::new(&post_id, &author_id, PostType::Post, &title);
            PostRepo::insert(database.pool(), &row)
                .await
                .context("Failed to create post")?;
            println!("✅ Post {} created by {}", row.id, row.author_id);
        }
    }
    Ok(())
}

pub async fn handle_comment(database: &Database, action: CommentAction) -> Result<()> {
    match action {
        CommentAction::Create {
            comment_id,
            post_id,
            author_id,
            body,
            reply_to,
        } => {
            let mut row = CommentRow::new(&comment_id, &post_id, &author_id, &body);
            if let Some(parent) = reply_to.as_deref() {
                row = row.reply_to(parent);
            }
            CommentRepo::insert(database.pool(), &row)
                .await
                .context("Failed to create comment")?;

            let kind = if row.is_top_level() { "Comment" } else { "Reply" };
            println!("✅ {} {} on {} by {}", kind, row.id, row.post_id, row.author_id);
        }
    }
    Ok(())
}
