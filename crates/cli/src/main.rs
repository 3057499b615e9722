//! Repbank CLI - economy operations from command line
//!
//! Usage:
//! ```bash
//! repbank init
//! repbank cipher award alice 50 --reason admin-grant
//! repbank question create q-1 alice "How do lifetimes work?" --bounty 20
//! repbank comment create a-1 q-1 bob "Like this..."
//! repbank vote post q-1 bob up
//! repbank accept q-1 a-1 --actor alice
//! repbank cipher audit
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use repbank_core::{AchievementCriteria, AuraReason, CipherReason, TargetKind, VoteType};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod db;

use commands::{achievement, aura, bounty, cipher, content, vote};

/// Repbank - Aura reputation and Cipher currency engine on SQLite
#[derive(Parser)]
#[command(name = "repbank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, default_value = "data/repbank.db", global = true)]
    pub db: PathBuf,

    /// Economy config (JSON); defaults are used when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and run migrations
    Init {
        /// Remove an existing database file first
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,

    /// Aura reputation
    Aura {
        #[command(subcommand)]
        action: AuraAction,
    },

    /// Cipher currency
    Cipher {
        #[command(subcommand)]
        action: CipherAction,
    },

    /// Plain posts
    Post {
        #[command(subcommand)]
        action: PostAction,
    },

    /// Questions with optional Cipher bounty
    Question {
        #[command(subcommand)]
        action: QuestionAction,
    },

    /// Comments and answers
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Vote on a post or comment
    Vote {
        /// Target kind
        kind: TargetKindArg,
        /// Target ID
        target_id: String,
        /// Voter user ID
        voter_id: String,
        /// Vote direction; `none` clears the vote
        direction: VoteArg,
    },

    /// Accept an answer on a question
    Accept {
        /// Question ID
        question_id: String,
        /// Answer (top-level comment) ID
        answer_id: String,
        /// Acting user (must be the question author)
        #[arg(long)]
        actor: String,
    },

    /// Clear the accepted answer on a question
    Unaccept {
        /// Question ID
        question_id: String,
        /// Acting user (must be the question author)
        #[arg(long)]
        actor: String,
    },

    /// Achievement catalog and unlocks
    Achievement {
        #[command(subcommand)]
        action: AchievementAction,
    },
}

#[derive(Subcommand)]
pub enum AuraAction {
    /// Award Aura to a user
    Award {
        user_id: String,
        amount: i64,
        #[arg(long, default_value = "admin-grant")]
        reason: AuraReasonArg,
        /// Causal source ID
        #[arg(long)]
        source: Option<String>,
    },
    /// Show Aura balance
    Balance { user_id: String },
    /// Show Aura history, newest first
    History {
        user_id: String,
        #[arg(long, default_value_t = 20)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
}

#[derive(Subcommand)]
pub enum CipherAction {
    /// Award Cipher to a user
    Award {
        user_id: String,
        amount: i64,
        #[arg(long, default_value = "admin-grant")]
        reason: CipherReasonArg,
        /// Causal source ID; repeated awards with the same source are ignored
        #[arg(long)]
        source: Option<String>,
    },
    /// Spend Cipher
    Spend {
        user_id: String,
        amount: i64,
        #[arg(long, default_value = "store-purchase")]
        reason: CipherReasonArg,
        #[arg(long)]
        source: Option<String>,
    },
    /// Show Cipher balance
    Balance { user_id: String },
    /// Show Cipher history, newest first
    History {
        user_id: String,
        #[arg(long, default_value_t = 20)]
        limit: i64,
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// Compare balance projections with ledger sums
    Audit {
        /// Single user to check (all users when omitted)
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PostAction {
    /// Create a plain post
    Create {
        post_id: String,
        author_id: String,
        title: String,
    },
}

#[derive(Subcommand)]
pub enum QuestionAction {
    /// Create a question; the bounty is debited from the author
    Create {
        question_id: String,
        author_id: String,
        title: String,
        #[arg(long, default_value_t = 0)]
        bounty: i64,
    },
    /// Show bounty state
    Show { question_id: String },
}

#[derive(Subcommand)]
pub enum CommentAction {
    /// Create a comment (top-level comments on questions are answers)
    Create {
        comment_id: String,
        post_id: String,
        author_id: String,
        body: String,
        /// Parent comment ID for nested replies
        #[arg(long)]
        reply_to: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AchievementAction {
    /// Define or update an achievement
    Define {
        achievement_id: String,
        name: String,
        #[arg(long)]
        criteria: CriteriaArg,
        #[arg(long)]
        threshold: i64,
        #[arg(long, default_value_t = 0)]
        aura_reward: i64,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List achievements, or a user's unlocks
    List {
        #[arg(long)]
        user: Option<String>,
    },
    /// Check and unlock achievements for a user
    Check {
        user_id: String,
        #[arg(long)]
        criteria: CriteriaArg,
        /// Current counter value; computed from the database when omitted
        #[arg(long)]
        value: Option<i64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TargetKindArg {
    Post,
    Comment,
}

impl TargetKindArg {
    pub fn to_core_type(self) -> TargetKind {
        match self {
            TargetKindArg::Post => TargetKind::Post,
            TargetKindArg::Comment => TargetKind::Comment,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum VoteArg {
    Up,
    Down,
    #[value(name = "none")]
    Clear,
}

impl VoteArg {
    pub fn to_core_type(self) -> Option<VoteType> {
        match self {
            VoteArg::Up => Some(VoteType::Up),
            VoteArg::Down => Some(VoteType::Down),
            VoteArg::Clear => None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AuraReasonArg {
    PostVote,
    CommentVote,
    AnswerAccepted,
    AchievementUnlocked,
    ContestPlacement,
    AdminGrant,
}

impl AuraReasonArg {
    pub fn to_core_type(self) -> AuraReason {
        match self {
            AuraReasonArg::PostVote => AuraReason::PostVote,
            AuraReasonArg::CommentVote => AuraReason::CommentVote,
            AuraReasonArg::AnswerAccepted => AuraReason::AnswerAccepted,
            AuraReasonArg::AchievementUnlocked => AuraReason::AchievementUnlocked,
            AuraReasonArg::ContestPlacement => AuraReason::ContestPlacement,
            AuraReasonArg::AdminGrant => AuraReason::AdminGrant,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CipherReasonArg {
    BountyCreated,
    AnswerAccepted,
    ContestEntry,
    ContestPrize,
    StorePurchase,
    AdminGrant,
}

impl CipherReasonArg {
    pub fn to_core_type(self) -> CipherReason {
        match self {
            CipherReasonArg::BountyCreated => CipherReason::BountyCreated,
            CipherReasonArg::AnswerAccepted => CipherReason::AnswerAccepted,
            CipherReasonArg::ContestEntry => CipherReason::ContestEntry,
            CipherReasonArg::ContestPrize => CipherReason::ContestPrize,
            CipherReasonArg::StorePurchase => CipherReason::StorePurchase,
            CipherReasonArg::AdminGrant => CipherReason::AdminGrant,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CriteriaArg {
    ProblemSolved,
    PostsCreated,
    CommentsCreated,
    AnswersAccepted,
    DailyStreak,
    AuraEarned,
}

impl CriteriaArg {
    pub fn to_core_type(self) -> AchievementCriteria {
        match self {
            CriteriaArg::ProblemSolved => AchievementCriteria::ProblemSolved,
            CriteriaArg::PostsCreated => AchievementCriteria::PostsCreated,
            CriteriaArg::CommentsCreated => AchievementCriteria::CommentsCreated,
            CriteriaArg::AnswersAccepted => AchievementCriteria::AnswersAccepted,
            CriteriaArg::DailyStreak => AchievementCriteria::DailyStreak,
            CriteriaArg::AuraEarned => AchievementCriteria::AuraEarned,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            db::init_database(&cli.db, force).await?;
            println!("✅ Database initialized at {:?}", cli.db);
        }

        Commands::Status => {
            db::show_status(&cli.db).await?;
        }

        Commands::Aura { action } => {
            let (database, ctx) = db::open_context(&cli.db, cli.config.as_deref()).await?;
            aura::handle(&ctx, action).await?;
            database.close().await;
        }

        Commands::Cipher { action } => {
            let (database, ctx) = db::open_context(&cli.db, cli.config.as_deref()).await?;
            cipher::handle(&ctx, action).await?;
            database.close().await;
        }

        Commands::Post { action } => {
            let database = db::open(&cli.db).await?;
            content::handle_post(&database, action).await?;
            database.close().await;
        }

        Commands::Question { action } => {
            let (database, ctx) = db::open_context(&cli.db, cli.config.as_deref()).await?;
            bounty::handle_question(&ctx, action).await?;
            database.close().await;
        }

        Commands::Comment { action } => {
            let database = db::open(&cli.db).await?;
            content::handle_comment(&database, action).await?;
            database.close().await;
        }

        Commands::Vote {
            kind,
            target_id,
            voter_id,
            direction,
        } => {
            let (database, ctx) = db::open_context(&cli.db, cli.config.as_deref()).await?;
            vote::cast(&ctx, kind, &target_id, &voter_id, direction).await?;
            database.close().await;
        }

        Commands::Accept {
            question_id,
            answer_id,
            actor,
        } => {
            let (database, ctx) = db::open_context(&cli.db, cli.config.as_deref()).await?;
            bounty::accept(&ctx, &question_id, &answer_id, &actor).await?;
            database.close().await;
        }

        Commands::Unaccept { question_id, actor } => {
            let (database, ctx) = db::open_context(&cli.db, cli.config.as_deref()).await?;
            bounty::unaccept(&ctx, &question_id, &actor).await?;
            database.close().await;
        }

        Commands::Achievement { action } => {
            let (database, ctx) = db::open_context(&cli.db, cli.config.as_deref()).await?;
            achievement::handle(&ctx, action).await?;
            database.close().await;
        }
    }

    Ok(())
}
