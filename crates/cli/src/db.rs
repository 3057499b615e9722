//! Database initialization, status, and service context setup

use anyhow::{Context, Result};
use repbank_business::{EconomyConfig, EconomyContext, NotificationDispatcher};
use repbank_persistence::Database;
use std::path::Path;
use tracing::debug;

/// Create (or recreate) the database and run migrations
pub async fn init_database(db_path: &Path, force: bool) -> Result<()> {
    if force && db_path.exists() {
        std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        println!("🗑️  Removed existing database");
    }

    let database = Database::open(db_path)
        .await
        .context("Failed to initialize database")?;
    database.close().await;
    Ok(())
}

/// Show database status
pub async fn show_status(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'repbank init' to create the database");
        return Ok(());
    }

    let database = Database::open(db_path).await?;
    let pool = database.pool();

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();

    for (label, table) in [
        ("Posts", "posts"),
        ("Comments", "comments"),
        ("Post votes", "post_votes"),
        ("Comment votes", "comment_votes"),
        ("Aura entries", "aura_ledger"),
        ("Cipher entries", "cipher_ledger"),
        ("Cipher accounts", "cipher_accounts"),
        ("Achievements", "achievements"),
        ("Unlocks", "user_achievements"),
    ] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .with_context(|| format!("Failed to count {table}"))?;
        println!("   {:<16} {}", format!("{label}:"), count.0);
    }

    database.close().await;
    Ok(())
}

/// Open the database and build the economy context
pub async fn open_context(
    db_path: &Path,
    config_path: Option<&Path>,
) -> Result<(Database, EconomyContext)> {
    let config = match config_path {
        Some(path) => EconomyConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => EconomyConfig::default(),
    };

    debug!(?config, "Economy config loaded");

    let database = open(db_path).await?;
    let ctx = EconomyContext::new(&database, config, NotificationDispatcher::log());
    Ok((database, ctx))
}

/// Open the database (migrations run on open)
pub async fn open(db_path: &Path) -> Result<Database> {
    Database::open(db_path)
        .await
        .with_context(|| format!("Failed to open database {:?}", db_path))
}
