//! # Model Errors
//!
//! Errors raised while building or parsing datasheet model values.

use thiserror::Error;

/// Result type for model construction
pub type ModelResult<T> = Result<T, ModelError>;

/// Datasheet model errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Bundle name is not one of national, local, school
    #[error("Unknown datasheet type: {0}")]
    UnknownType(String),

    /// Stage name is not one of primary, secondary
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// Year code outside 0..=99
    #[error("Invalid academic year code: {0}")]
    InvalidYear(i64),

    /// Title is empty or longer than the maximum length
    #[error("Invalid title: {0}")]
    InvalidTitle(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ModelError::UnknownType("regional".into()).to_string(),
            "Unknown datasheet type: regional"
        );
        assert_eq!(ModelError::InvalidYear(120).to_string(), "Invalid academic year code: 120");
    }
}
