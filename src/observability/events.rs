//! Observable events emitted by the access engine and the validator.

use std::fmt;

use super::logger::Severity;

/// Events emitted by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Access decisions
    /// Operation allowed
    AccessAllowed,
    /// Operation denied
    AccessDenied,
    /// A collaborator failed while deciding; treated as deny
    AccessFault,

    // Uniqueness
    /// Candidate has a unique key
    UniquenessPassed,
    /// Candidate is incomplete, check not applicable
    UniquenessSkipped,
    /// Candidate duplicates an existing record
    UniquenessViolation,
    /// Record query failed; write blocked
    UniquenessQueryFailed,

    // Configuration
    ConfigLoaded,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::AccessAllowed => "ACCESS_ALLOWED",
            Event::AccessDenied => "ACCESS_DENIED",
            Event::AccessFault => "ACCESS_FAULT",
            Event::UniquenessPassed => "UNIQUENESS_PASSED",
            Event::UniquenessSkipped => "UNIQUENESS_SKIPPED",
            Event::UniquenessViolation => "UNIQUENESS_VIOLATION",
            Event::UniquenessQueryFailed => "UNIQUENESS_QUERY_FAILED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::AccessAllowed | Event::UniquenessPassed | Event::UniquenessSkipped => {
                Severity::Trace
            }
            Event::AccessDenied | Event::ConfigLoaded => Severity::Info,
            Event::UniquenessViolation => Severity::Warn,
            Event::AccessFault | Event::UniquenessQueryFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
