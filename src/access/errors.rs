//! # Access Errors
//!
//! Denials are ordinary `Decision` values. These errors cover the cases
//! where no decision could be reached at all.

use thiserror::Error;

use crate::errors::CollaboratorError;

/// Result type for access decisions
pub type AccessResult<T> = Result<T, AccessError>;

/// Access engine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// A collaborator failed; callers must fail closed
    #[error("Access check failed: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Operation name could not be parsed
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl AccessError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::InvalidOperation(_) => 400,
            AccessError::Collaborator(_) => 503,
        }
    }

    /// Returns whether the caller, rather than the environment, is at fault
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
