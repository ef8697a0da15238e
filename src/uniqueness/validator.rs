//! Uniqueness validator for datasheets
//!
//! Validation semantics:
//! - Incomplete candidates (no stage, no year, or a school sheet without a
//!   school) pass; the check applies once the key is fully specified
//! - The key is (type, stage, year), plus the school for school sheets
//! - The candidate's own id is excluded, so re-saving a record is allowed
//! - A failed record query blocks the write
//!
//! The check is optimistic. Two concurrent creates with the same key can
//! both pass; the store must still enforce the key on commit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::datasheet::{Datasheet, DatasheetId};
use crate::observability::{log_event_with_fields, Event};

use super::errors::{UniquenessError, UniquenessResult};
use super::query::{DatasheetKey, RecordQuery};

/// Which message variant a violation carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// National and local sheets, keyed by type
    Generic,
    /// School sheets, keyed by school
    School,
}

/// A duplicate key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub key: DatasheetKey,
    pub message: String,
    /// Existing records holding the key
    pub conflicting: BTreeSet<DatasheetId>,
}

impl Violation {
    fn new(key: DatasheetKey, conflicting: BTreeSet<DatasheetId>) -> Self {
        let (kind, message) = match key.school {
            Some(school) => (
                ViolationKind::School,
                format!(
                    "A datasheet already exists for this combination of school, stage and year ({}, {}, {}).",
                    school, key.stage, key.year
                ),
            ),
            None => (
                ViolationKind::Generic,
                format!(
                    "A datasheet already exists for this combination of type, stage and year ({}, {}, {}).",
                    key.bundle, key.stage, key.year
                ),
            ),
        };

        Self {
            kind,
            key,
            message,
            conflicting,
        }
    }
}

/// Outcome of a uniqueness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// No other record holds the key
    Unique,
    /// Key not fully specified; nothing to check
    Incomplete,
    Duplicate(Violation),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        !matches!(self, Validation::Duplicate(_))
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Validation::Duplicate(violation) => Some(violation),
            _ => None,
        }
    }
}

/// Rejects datasheets whose identity key is already taken.
///
/// Stateless apart from the injected query; safe to share across threads.
pub struct UniquenessValidator {
    query: Arc<dyn RecordQuery>,
}

impl UniquenessValidator {
    pub fn new(query: Arc<dyn RecordQuery>) -> Self {
        Self { query }
    }

    /// Checks a candidate against existing records.
    ///
    /// # Errors
    ///
    /// Returns `UniquenessError::QueryFailed` if the record query fails.
    /// Duplicates are reported as `Validation::Duplicate`, not as errors.
    pub fn validate(&self, candidate: &Datasheet) -> UniquenessResult<Validation> {
        let Some(key) = DatasheetKey::for_record(candidate) else {
            log_event_with_fields(
                Event::UniquenessSkipped,
                &[("candidate", candidate.cache_tag().as_str())],
            );
            return Ok(Validation::Incomplete);
        };

        let key_str = key.to_string();
        let conflicting = match self.query.find_by_key(&key, candidate.id) {
            Ok(ids) => ids,
            Err(err) => {
                let message = err.to_string();
                log_event_with_fields(
                    Event::UniquenessQueryFailed,
                    &[("error", message.as_str()), ("key", key_str.as_str())],
                );
                return Err(UniquenessError::QueryFailed(err));
            }
        };

        if conflicting.is_empty() {
            log_event_with_fields(Event::UniquenessPassed, &[("key", key_str.as_str())]);
            return Ok(Validation::Unique);
        }

        let existing = conflicting
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        log_event_with_fields(
            Event::UniquenessViolation,
            &[
                ("candidate", candidate.cache_tag().as_str()),
                ("existing", existing.as_str()),
                ("key", key_str.as_str()),
            ],
        );

        Ok(Validation::Duplicate(Violation::new(key, conflicting)))
    }

    /// Write-path guard: `Ok(())` only when the write may proceed.
    pub fn ensure_unique(&self, candidate: &Datasheet) -> UniquenessResult<()> {
        match self.validate(candidate)? {
            Validation::Duplicate(violation) => Err(UniquenessError::Duplicate(violation)),
            Validation::Unique | Validation::Incomplete => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasheet::{ActorId, DatasheetType, RevisionId, SchoolId, Stage, YearCode};
    use crate::errors::{CollaboratorError, CollaboratorResult};
    use crate::uniqueness::query::MemoryRecordQuery;

    struct FailingQuery;

    impl RecordQuery for FailingQuery {
        fn find_by_key(
            &self,
            _key: &DatasheetKey,
            _exclude: Option<DatasheetId>,
        ) -> CollaboratorResult<BTreeSet<DatasheetId>> {
            Err(CollaboratorError::unavailable("record_query", "database offline"))
        }
    }

    fn national(id: Option<u64>) -> Datasheet {
        let sheet = Datasheet::new(DatasheetType::National, "National", ActorId(1))
            .unwrap()
            .with_stage(Stage::Primary)
            .with_year(YearCode::new(24).unwrap());
        match id {
            Some(id) => sheet.with_id(DatasheetId(id), RevisionId(id)),
            None => sheet,
        }
    }

    #[test]
    fn test_generic_message() {
        let index = Arc::new(MemoryRecordQuery::new());
        index.insert(&national(Some(1)));
        let validator = UniquenessValidator::new(index);

        let result = validator.validate(&national(None)).unwrap();
        let violation = result.violation().unwrap();
        assert_eq!(violation.kind, ViolationKind::Generic);
        assert_eq!(
            violation.message,
            "A datasheet already exists for this combination of type, stage and year (national, primary, 24)."
        );
        assert!(violation.conflicting.contains(&DatasheetId(1)));
    }

    #[test]
    fn test_school_message() {
        let index = Arc::new(MemoryRecordQuery::new());
        let existing = Datasheet::new(DatasheetType::School, "S", ActorId(1))
            .unwrap()
            .with_id(DatasheetId(1), RevisionId(1))
            .with_school(SchoolId(8))
            .with_stage(Stage::Secondary)
            .with_year(YearCode::new(5).unwrap());
        index.insert(&existing);
        let validator = UniquenessValidator::new(index);

        let mut candidate = existing.clone();
        candidate.id = None;
        let violation = validator.validate(&candidate).unwrap().violation().cloned().unwrap();
        assert_eq!(violation.kind, ViolationKind::School);
        assert_eq!(
            violation.message,
            "A datasheet already exists for this combination of school, stage and year (8, secondary, 05)."
        );
    }

    #[test]
    fn test_incomplete_candidate_skips_query() {
        let validator = UniquenessValidator::new(Arc::new(FailingQuery));
        let mut candidate = national(None);
        candidate.stage = None;

        assert_eq!(validator.validate(&candidate).unwrap(), Validation::Incomplete);
        assert!(validator.ensure_unique(&candidate).is_ok());
    }

    #[test]
    fn test_query_failure_blocks_write() {
        let validator = UniquenessValidator::new(Arc::new(FailingQuery));
        let result = validator.ensure_unique(&national(None));

        assert!(matches!(result, Err(UniquenessError::QueryFailed(_))));
    }

    #[test]
    fn test_ensure_unique_reports_duplicate() {
        let index = Arc::new(MemoryRecordQuery::new());
        index.insert(&national(Some(1)));
        let validator = UniquenessValidator::new(index);

        let err = validator.ensure_unique(&national(Some(2))).unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.violation().unwrap().kind, ViolationKind::Generic);
    }

    #[test]
    fn test_violation_serializes_kind() {
        let index = Arc::new(MemoryRecordQuery::new());
        index.insert(&national(Some(1)));
        let validator = UniquenessValidator::new(index);

        let violation = validator.validate(&national(None)).unwrap().violation().cloned().unwrap();
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["kind"], "generic");
    }
}
