//! Business layer errors

use repbank_core::{AchievementCriteria, CoreError, TargetKind};
use thiserror::Error;

/// Economy operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    // === Validation errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    // === Permission errors ===
    #[error("Bounty action not allowed: {reason}")]
    UnauthorizedBountyAction { reason: String },

    // === Not found errors ===
    #[error("Vote target not found: {kind} {id}")]
    TargetNotFound { kind: TargetKind, id: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    // === Achievement errors ===
    #[error("No counter available for criteria {0}")]
    UnsupportedCriteria(AchievementCriteria),

    // === Configuration errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    // === Wrapped errors ===
    #[error("Persistence error: {0}")]
    Persistence(#[from] repbank_persistence::PersistenceError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for economy operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl BusinessError {
    /// Create insufficient funds error
    pub fn insufficient_funds(required: i64, available: i64) -> Self {
        Self::InsufficientFunds {
            required,
            available,
        }
    }

    /// Create unauthorized bounty action error
    pub fn unauthorized(reason: &str) -> Self {
        Self::UnauthorizedBountyAction {
            reason: reason.to_string(),
        }
    }

    pub fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::InsufficientFunds { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::UnauthorizedBountyAction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_error() {
        let err = BusinessError::insufficient_funds(60, 40);
        assert!(err.is_insufficient_funds());
        assert!(err.to_string().contains("required 60"));
        assert!(err.to_string().contains("available 40"));
    }

    #[test]
    fn test_unauthorized_error() {
        let err = BusinessError::unauthorized("only the question author can accept an answer");
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("question author"));
    }

    #[test]
    fn test_target_not_found_display() {
        let err = BusinessError::TargetNotFound {
            kind: TargetKind::Comment,
            id: "c-9".to_string(),
        };
        assert_eq!(err.to_string(), "Vote target not found: comment c-9");
    }
}
