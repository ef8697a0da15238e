//! Uniqueness enforcement for datasheets
//!
//! No two non-deleted datasheets may share (type, stage, year), or
//! (school, stage, year) for school datasheets. The key's shape differs by
//! bundle, so it is checked here rather than by a storage constraint.

mod errors;
mod query;
mod validator;

pub use errors::{UniquenessError, UniquenessResult};
pub use query::{DatasheetKey, MemoryRecordQuery, RecordQuery};
pub use validator::{UniquenessValidator, Validation, Violation, ViolationKind};
