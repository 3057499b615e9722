//! Economy configuration with configurable point values
//!
//! Every field has a serde default, so a partial JSON file only overrides
//! what it names.

use crate::error::{BusinessError, BusinessResult};
use repbank_core::{TargetKind, VotePoints};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the economy engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyConfig {
    // === Vote rewards ===
    /// Aura for the author per UP / DOWN on a post
    #[serde(default = "default_post_points")]
    pub post_points: VotePoints,

    /// Aura for the author per UP / DOWN on a comment
    #[serde(default = "default_comment_points")]
    pub comment_points: VotePoints,

    // === Bounty ===
    /// Fixed Aura bonus when an answer is accepted
    #[serde(default = "default_answer_accepted_aura")]
    pub answer_accepted_aura: i64,

    // === Reads ===
    /// Upper bound for history page size
    #[serde(default = "default_history_page_limit")]
    pub history_page_limit: i64,
}

// Default value functions for serde
fn default_post_points() -> VotePoints {
    VotePoints::POST
}

fn default_comment_points() -> VotePoints {
    VotePoints::COMMENT
}

fn default_answer_accepted_aura() -> i64 {
    15
}

fn default_history_page_limit() -> i64 {
    100
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            post_points: default_post_points(),
            comment_points: default_comment_points(),
            answer_accepted_aura: default_answer_accepted_aura(),
            history_page_limit: default_history_page_limit(),
        }
    }
}

impl EconomyConfig {
    /// Load from a JSON file, then validate
    pub fn from_json_file(path: impl AsRef<Path>) -> BusinessResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BusinessError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            BusinessError::Configuration(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BusinessResult<()> {
        for (name, points) in [("post", self.post_points), ("comment", self.comment_points)] {
            if points.up <= 0 || points.down > 0 {
                return Err(BusinessError::Configuration(format!(
                    "{name} vote points must be up > 0 and down <= 0, got {}/{}",
                    points.up, points.down
                )));
            }
        }
        if self.answer_accepted_aura < 0 {
            return Err(BusinessError::Configuration(
                "answer_accepted_aura must be >= 0".to_string(),
            ));
        }
        if self.history_page_limit <= 0 {
            return Err(BusinessError::Configuration(
                "history_page_limit must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn points_for(&self, kind: TargetKind) -> VotePoints {
        match kind {
            TargetKind::Post => self.post_points,
            TargetKind::Comment => self.comment_points,
        }
    }

    /// Clamp a requested page to `[1, history_page_limit]` and offset to `>= 0`
    pub fn page(&self, limit: i64, offset: i64) -> (i64, i64) {
        (limit.clamp(1, self.history_page_limit), offset.max(0))
    }
}
