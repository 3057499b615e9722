//! # Error Module
//!
//! Domain errors cho Repbank core sử dụng thiserror.

use thiserror::Error;

/// Core domain errors.
///
/// Các lỗi nghiệp vụ cốt lõi, không liên quan đến infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Ledger entry amount must be non-zero")]
    ZeroAmount,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Result type alias với CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CoreError::ZeroAmount.to_string(),
            "Ledger entry amount must be non-zero"
        );

        let err = CoreError::unknown("aura reason", "FOO");
        assert_eq!(err.to_string(), "Unknown aura reason value: FOO");
    }
}
