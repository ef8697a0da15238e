//! Access decisions and their cache annotations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::datasheet::{SchoolId, YearCode};

/// Cache tag for decisions that read the working academic year
pub const WORKING_YEAR_TAG: &str = "academic_year:working";

/// What a decision depends on, for an external response cache.
///
/// Advisory only; the engine never consults it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDimensions {
    /// Varies with the actor's permission set
    pub permissions: bool,
    /// Varies per actor
    pub user: bool,
    /// Invalidated when any of these records change
    pub entity_deps: BTreeSet<String>,
    /// Varies with the current route
    pub route: bool,
}

impl CacheDimensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn per_permissions(mut self) -> Self {
        self.permissions = true;
        self
    }

    pub fn per_user(mut self) -> Self {
        self.user = true;
        self
    }

    pub fn per_route(mut self) -> Self {
        self.route = true;
        self
    }

    pub fn with_dependency(mut self, tag: impl Into<String>) -> Self {
        self.entity_deps.insert(tag.into());
        self
    }
}

/// Why an operation was denied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    /// Actor lacks a required permission
    MissingPermission { permission: String },
    /// School datasheet create without a school to attach it to
    NoContext,
    /// The `sid` given at create time does not name a school
    InvalidSchool { sid: String },
    /// Auditor is not assigned to the school they are creating for
    NotAssignedToCreate { school: SchoolId },
    /// School datasheet carries no school reference
    NoSchoolReference,
    /// Referenced school does not exist
    SchoolNotFound { school: SchoolId },
    /// Auditor is not assigned to the datasheet's school
    NotAssigned { school: SchoolId },
    /// Datasheet belongs to a past academic year
    StaleYear {
        year: Option<YearCode>,
        working_year: YearCode,
    },
    /// Operation needs an existing datasheet but only a bundle was given
    RequiresEntity { operation: String },
    /// Operation not granted by any rule
    UnsupportedOperation { operation: String },
    /// A collaborator failed and the decision failed closed
    CollaboratorUnavailable { message: String },
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::MissingPermission { permission } => {
                write!(f, "The '{}' permission is required.", permission)
            }
            DenialReason::NoContext => write!(
                f,
                "Cannot create datasheet without context - you must create school datasheets via the school's page."
            ),
            DenialReason::InvalidSchool { sid } => write!(f, "Invalid school: {}", sid),
            DenialReason::NotAssignedToCreate { .. } => write!(
                f,
                "Auditor cannot create a datasheet here, as they are not assigned to this school"
            ),
            DenialReason::NoSchoolReference => write!(f, "Datasheet is not linked to a school"),
            DenialReason::SchoolNotFound { school } => write!(f, "School {} not found", school),
            DenialReason::NotAssigned { school } => {
                write!(f, "Auditor is not assigned to school {}", school)
            }
            DenialReason::StaleYear { year, working_year } => match year {
                Some(year) => write!(
                    f,
                    "stale year: datasheet year {} is not the working year {}",
                    year, working_year
                ),
                None => write!(
                    f,
                    "stale year: datasheet has no year, working year is {}",
                    working_year
                ),
            },
            DenialReason::RequiresEntity { operation } => {
                write!(f, "Operation '{}' requires an existing datasheet", operation)
            }
            DenialReason::UnsupportedOperation { operation } => {
                write!(f, "Operation '{}' is not permitted", operation)
            }
            DenialReason::CollaboratorUnavailable { message } => {
                write!(f, "Access could not be determined: {}", message)
            }
        }
    }
}

/// Outcome of an access check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub allowed: bool,
    /// Always present on a denial, never on an allow
    pub reason: Option<DenialReason>,
    pub cache: CacheDimensions,
}

impl Decision {
    pub fn allowed(cache: CacheDimensions) -> Self {
        Self {
            allowed: true,
            reason: None,
            cache,
        }
    }

    pub fn denied(reason: DenialReason, cache: CacheDimensions) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            cache,
        }
    }

    /// Allow iff `granted`, denying for lack of `permission`; cached per permissions
    pub fn allowed_if_permission(granted: bool, permission: &str) -> Self {
        let cache = CacheDimensions::new().per_permissions();
        if granted {
            Self::allowed(cache)
        } else {
            Self::denied(
                DenialReason::MissingPermission {
                    permission: permission.to_string(),
                },
                cache,
            )
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub fn is_denied(&self) -> bool {
        !self.allowed
    }

    /// Human-readable denial reason for UI feedback
    pub fn message(&self) -> Option<String> {
        self.reason.as_ref().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_has_no_reason() {
        let decision = Decision::allowed(CacheDimensions::new().per_permissions());
        assert!(decision.is_allowed());
        assert!(decision.message().is_none());
    }

    #[test]
    fn test_allowed_if_permission() {
        let denied = Decision::allowed_if_permission(false, "view datasheet revisions");
        assert!(denied.is_denied());
        assert!(denied.cache.permissions);
        assert_eq!(
            denied.message().unwrap(),
            "The 'view datasheet revisions' permission is required."
        );
    }

    #[test]
    fn test_dependencies_are_deduplicated() {
        let cache = CacheDimensions::new()
            .per_user()
            .with_dependency("school:1")
            .with_dependency("school:1");

        assert!(cache.user && !cache.route && !cache.permissions);
        assert_eq!(cache.entity_deps.len(), 1);
    }

    #[test]
    fn test_stale_year_message() {
        let reason = DenialReason::StaleYear {
            year: Some(YearCode::new(23).unwrap()),
            working_year: YearCode::new(24).unwrap(),
        };
        assert!(reason.to_string().starts_with("stale year"));
        assert!(reason.to_string().contains("23"));
    }

    #[test]
    fn test_reason_serializes_with_kind_tag() {
        let json = serde_json::to_value(DenialReason::NotAssigned { school: SchoolId(4) }).unwrap();
        assert_eq!(json["kind"], "not_assigned");
        assert_eq!(json["school"], 4);
    }
}
