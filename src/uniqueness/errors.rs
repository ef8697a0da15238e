//! # Uniqueness Errors

use thiserror::Error;

use crate::errors::CollaboratorError;

use super::validator::Violation;

/// Result type for uniqueness checks
pub type UniquenessResult<T> = Result<T, UniquenessError>;

/// Reasons a write must be blocked
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UniquenessError {
    /// Another record already holds the candidate's key
    #[error("{}", .0.message)]
    Duplicate(Violation),

    /// The record query failed; uniqueness could not be established
    #[error("Uniqueness check failed: {0}")]
    QueryFailed(#[from] CollaboratorError),
}

impl UniquenessError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            UniquenessError::Duplicate(_) => 409,
            UniquenessError::QueryFailed(_) => 503,
        }
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            UniquenessError::Duplicate(violation) => Some(violation),
            UniquenessError::QueryFailed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_failure_is_server_error() {
        let err = UniquenessError::from(CollaboratorError::unavailable("record_query", "down"));
        assert_eq!(err.status_code(), 503);
        assert!(err.violation().is_none());
        assert!(err.to_string().starts_with("Uniqueness check failed"));
    }
}
