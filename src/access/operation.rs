//! Operations an actor may attempt on a datasheet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::AccessError;
use super::permissions;

/// Datasheet operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    View,
    Create,
    Update,
    Delete,
    ViewRevision,
    ViewAllRevisions,
    Revert,
    RevertRevision,
    DeleteRevision,
    /// Any other named operation; handled by the baseline
    Other(String),
}

impl Operation {
    /// Canonical name, words separated by spaces (`view revision`)
    pub fn as_str(&self) -> &str {
        match self {
            Operation::View => "view",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::ViewRevision => "view revision",
            Operation::ViewAllRevisions => "view all revisions",
            Operation::Revert => "revert",
            Operation::RevertRevision => "revert revision",
            Operation::DeleteRevision => "delete revision",
            Operation::Other(name) => name,
        }
    }

    /// Dedicated permission for revision operations, `None` otherwise
    pub fn revision_permission(&self) -> Option<&'static str> {
        match self {
            Operation::ViewRevision | Operation::ViewAllRevisions => {
                Some(permissions::VIEW_REVISIONS)
            }
            Operation::Revert | Operation::RevertRevision => Some(permissions::REVERT_REVISIONS),
            Operation::DeleteRevision => Some(permissions::DELETE_REVISIONS),
            _ => None,
        }
    }

    pub fn is_revision_operation(&self) -> bool {
        self.revision_permission().is_some()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses `view revision` and `view_revision` alike
impl FromStr for Operation {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', " ");
        if normalized.is_empty() {
            return Err(AccessError::InvalidOperation("empty operation name".to_string()));
        }

        let op = match normalized.as_str() {
            "view" => Operation::View,
            "create" => Operation::Create,
            "update" => Operation::Update,
            "delete" => Operation::Delete,
            "view revision" => Operation::ViewRevision,
            "view all revisions" => Operation::ViewAllRevisions,
            "revert" => Operation::Revert,
            "revert revision" => Operation::RevertRevision,
            "delete revision" => Operation::DeleteRevision,
            _ => Operation::Other(normalized),
        };
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_both_separators() {
        assert_eq!("view_revision".parse::<Operation>().unwrap(), Operation::ViewRevision);
        assert_eq!("view revision".parse::<Operation>().unwrap(), Operation::ViewRevision);
        assert_eq!(
            "view_all_revisions".parse::<Operation>().unwrap(),
            Operation::ViewAllRevisions
        );
    }

    #[test]
    fn test_unknown_operation_is_other() {
        assert_eq!(
            "view label".parse::<Operation>().unwrap(),
            Operation::Other("view label".to_string())
        );
    }

    #[test]
    fn test_empty_operation_rejected() {
        assert!(matches!(" ".parse::<Operation>(), Err(AccessError::InvalidOperation(_))));
    }

    #[test]
    fn test_revision_permissions() {
        assert_eq!(Operation::ViewRevision.revision_permission(), Some(permissions::VIEW_REVISIONS));
        assert_eq!(Operation::Revert.revision_permission(), Some(permissions::REVERT_REVISIONS));
        assert_eq!(
            Operation::RevertRevision.revision_permission(),
            Some(permissions::REVERT_REVISIONS)
        );
        assert_eq!(
            Operation::DeleteRevision.revision_permission(),
            Some(permissions::DELETE_REVISIONS)
        );
        assert!(!Operation::Delete.is_revision_operation());
    }
}
