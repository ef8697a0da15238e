//! Identity keys and the record query used to find conflicting datasheets.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::datasheet::{Datasheet, DatasheetId, DatasheetType, SchoolId, Stage, YearCode};
use crate::errors::CollaboratorResult;

/// The tuple that must be unique across datasheets.
///
/// `school` is set exactly when `bundle` is school-scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasheetKey {
    pub bundle: DatasheetType,
    pub stage: Stage,
    pub year: YearCode,
    pub school: Option<SchoolId>,
}

impl DatasheetKey {
    /// Key for a record, or `None` if the record is not fully specified yet
    pub fn for_record(record: &Datasheet) -> Option<Self> {
        let stage = record.stage?;
        let year = record.year?;
        let school = if record.bundle.is_school_scoped() {
            Some(record.school?)
        } else {
            None
        };

        Some(Self {
            bundle: record.bundle,
            stage,
            year,
            school,
        })
    }
}

impl fmt::Display for DatasheetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.school {
            Some(school) => write!(f, "({}, {}, {})", school, self.stage, self.year),
            None => write!(f, "({}, {}, {})", self.bundle, self.stage, self.year),
        }
    }
}

/// Finds existing, non-deleted datasheets by identity key
pub trait RecordQuery: Send + Sync {
    /// Ids of records whose key equals `key`, never including `exclude`
    fn find_by_key(
        &self,
        key: &DatasheetKey,
        exclude: Option<DatasheetId>,
    ) -> CollaboratorResult<BTreeSet<DatasheetId>>;
}

/// In-memory record index keyed by datasheet id.
///
/// A poisoned lock is recovered: every write is a single map insert or
/// remove, so the index is never left half-updated.
#[derive(Debug, Default)]
pub struct MemoryRecordQuery {
    records: RwLock<BTreeMap<DatasheetId, Option<DatasheetKey>>>,
}

impl MemoryRecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<DatasheetId, Option<DatasheetKey>>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<DatasheetId, Option<DatasheetKey>>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Indexes a saved record, replacing any previous revision.
    ///
    /// Returns `false` for unsaved records, which are not indexed.
    pub fn insert(&self, record: &Datasheet) -> bool {
        let Some(id) = record.id else {
            return false;
        };
        self.write().insert(id, DatasheetKey::for_record(record));
        true
    }

    /// Drops a deleted record from the index
    pub fn remove(&self, id: DatasheetId) -> bool {
        self.write().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordQuery for MemoryRecordQuery {
    fn find_by_key(
        &self,
        key: &DatasheetKey,
        exclude: Option<DatasheetId>,
    ) -> CollaboratorResult<BTreeSet<DatasheetId>> {
        Ok(self
            .read()
            .iter()
            .filter(|(id, _)| Some(**id) != exclude)
            .filter(|(_, stored)| stored.as_ref() == Some(key))
            .map(|(id, _)| *id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasheet::{ActorId, RevisionId};

    fn year(code: u8) -> YearCode {
        YearCode::new(code).unwrap()
    }

    fn saved(id: u64, bundle: DatasheetType) -> Datasheet {
        Datasheet::new(bundle, "Sheet", ActorId(1))
            .unwrap()
            .with_id(DatasheetId(id), RevisionId(id))
            .with_stage(Stage::Primary)
            .with_year(year(24))
    }

    #[test]
    fn test_key_requires_stage_and_year() {
        let sheet = Datasheet::new(DatasheetType::National, "N", ActorId(1)).unwrap();
        assert!(DatasheetKey::for_record(&sheet).is_none());
        assert!(DatasheetKey::for_record(&sheet.clone().with_stage(Stage::Primary)).is_none());
        assert!(DatasheetKey::for_record(&sheet.with_stage(Stage::Primary).with_year(year(24))).is_some());
    }

    #[test]
    fn test_school_key_requires_school() {
        let sheet = saved(1, DatasheetType::School);
        assert!(DatasheetKey::for_record(&sheet).is_none());
        let key = DatasheetKey::for_record(&sheet.with_school(SchoolId(3))).unwrap();
        assert_eq!(key.school, Some(SchoolId(3)));
    }

    #[test]
    fn test_non_school_key_ignores_school() {
        let sheet = saved(1, DatasheetType::Local).with_school(SchoolId(3));
        let key = DatasheetKey::for_record(&sheet).unwrap();
        assert_eq!(key.school, None);
        assert_eq!(key.to_string(), "(local, primary, 24)");
    }

    #[test]
    fn test_find_excludes_given_id() {
        let index = MemoryRecordQuery::new();
        let a = saved(1, DatasheetType::National);
        let b = saved(2, DatasheetType::National);
        index.insert(&a);
        index.insert(&b);

        let key = DatasheetKey::for_record(&a).unwrap();
        let found = index.find_by_key(&key, Some(DatasheetId(1))).unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![DatasheetId(2)]);
    }

    #[test]
    fn test_unsaved_records_not_indexed() {
        let index = MemoryRecordQuery::new();
        let draft = Datasheet::new(DatasheetType::National, "Draft", ActorId(1)).unwrap();
        assert!(!index.insert(&draft));
        assert!(index.is_empty());
    }

    #[test]
    fn test_remove_and_reinsert() {
        let index = MemoryRecordQuery::new();
        let a = saved(1, DatasheetType::National);
        index.insert(&a);
        assert!(index.remove(DatasheetId(1)));
        assert!(!index.remove(DatasheetId(1)));

        let key = DatasheetKey::for_record(&a).unwrap();
        assert!(index.find_by_key(&key, None).unwrap().is_empty());
    }

    #[test]
    fn test_poisoned_index_still_finds_conflicts() {
        let index = MemoryRecordQuery::new();
        let a = saved(1, DatasheetType::National);
        index.insert(&a);

        std::thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = index.records.write().unwrap();
                    panic!("writer died holding the lock");
                })
                .join();
        });
        assert!(index.records.is_poisoned());

        let key = DatasheetKey::for_record(&a).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.find_by_key(&key, None).unwrap().len(), 1);
        assert!(index.insert(&saved(2, DatasheetType::National)));
        assert_eq!(index.find_by_key(&key, None).unwrap().len(), 2);
    }
}
