//! # Collaborator Errors
//!
//! Faults raised by the external systems the core reads from (school
//! directory, academic calendar, record store). Denials are never errors;
//! only an unreachable or misbehaving collaborator ends up here.

use thiserror::Error;

/// Result type for collaborator reads
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// A fault reported by an external collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// Collaborator could not be reached or timed out
    #[error("{collaborator} unavailable: {message}")]
    Unavailable {
        collaborator: &'static str,
        message: String,
    },

    /// Collaborator answered with data the core cannot use
    #[error("{collaborator} returned an invalid response: {message}")]
    InvalidResponse {
        collaborator: &'static str,
        message: String,
    },
}

impl CollaboratorError {
    pub fn unavailable(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            collaborator,
            message: message.into(),
        }
    }

    pub fn invalid_response(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            collaborator,
            message: message.into(),
        }
    }

    /// Name of the collaborator that failed
    pub fn collaborator(&self) -> &'static str {
        match self {
            Self::Unavailable { collaborator, .. } => collaborator,
            Self::InvalidResponse { collaborator, .. } => collaborator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_collaborator() {
        let err = CollaboratorError::unavailable("school_lookup", "connection refused");
        assert_eq!(err.to_string(), "school_lookup unavailable: connection refused");
        assert_eq!(err.collaborator(), "school_lookup");
    }

    #[test]
    fn test_invalid_response() {
        let err = CollaboratorError::invalid_response("record_query", "negative id");
        assert!(err.to_string().contains("invalid response"));
    }
}
