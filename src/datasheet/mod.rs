//! # Datasheet Model
//!
//! Record types shared by the access engine and the uniqueness validator.
//! Storage and revision history live outside this crate; these types only
//! describe a record as the core sees it.

mod errors;
mod report;
mod types;

pub use errors::{ModelError, ModelResult};
pub use report::{compare_type, sort_by_type, SortOrder};
pub use types::{
    ActorId, Datasheet, DatasheetId, DatasheetType, RevisionId, RevisionMetadata, SchoolId,
    Stage, YearCode, TITLE_MAX_LENGTH,
};
