//! School records and the auditor assignment relation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::datasheet::{ActorId, SchoolId};
use crate::errors::CollaboratorResult;

/// A school as seen by the core: identity plus assigned auditors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    /// Auditors allowed to work on this school's datasheets
    #[serde(default)]
    pub assigned_auditors: BTreeSet<ActorId>,
}

impl School {
    pub fn new(id: SchoolId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            assigned_auditors: BTreeSet::new(),
        }
    }

    pub fn with_auditor(mut self, auditor: ActorId) -> Self {
        self.assigned_auditors.insert(auditor);
        self
    }

    /// Cache tag identifying this record, e.g. `school:7`
    pub fn cache_tag(&self) -> String {
        format!("school:{}", self.id)
    }
}

/// Resolves schools by id
pub trait SchoolLookup: Send + Sync {
    /// Returns `Ok(None)` when no school has this id.
    fn by_id(&self, id: SchoolId) -> CollaboratorResult<Option<School>>;
}

/// Answers whether an actor is assigned to a school
pub trait SchoolAssignmentOracle: Send + Sync {
    fn is_assigned(&self, school: &School, actor: ActorId) -> bool;
}

/// Assignment read straight from `School::assigned_auditors`
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditorAssignments;

impl SchoolAssignmentOracle for AuditorAssignments {
    fn is_assigned(&self, school: &School, actor: ActorId) -> bool {
        school.assigned_auditors.contains(&actor)
    }
}

/// In-memory school directory.
///
/// Suitable for tests and for embedders that already hold the full school
/// list in memory. A poisoned lock is recovered, as every write is a single
/// map insert or remove.
#[derive(Debug, Default)]
pub struct MemorySchoolDirectory {
    schools: RwLock<HashMap<SchoolId, School>>,
}

impl MemorySchoolDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<SchoolId, School>> {
        self.schools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SchoolId, School>> {
        self.schools.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_school(self, school: School) -> Self {
        self.insert(school);
        self
    }

    /// Inserts or replaces a school
    pub fn insert(&self, school: School) {
        self.write().insert(school.id, school);
    }

    pub fn remove(&self, id: SchoolId) -> Option<School> {
        self.write().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SchoolLookup for MemorySchoolDirectory {
    fn by_id(&self, id: SchoolId) -> CollaboratorResult<Option<School>> {
        Ok(self.read().get(&id).cloned())
    }
}
