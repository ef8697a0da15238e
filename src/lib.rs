//! datasheet_core - access control and uniqueness enforcement for datasheets
//!
//! Datasheets are revisioned statistical reports at national, local or school
//! level. This crate decides who may work with them and keeps their identity
//! keys unique. Storage, routing and rendering are left to the embedding
//! application, which supplies the collaborators defined here.

pub mod access;
pub mod config;
pub mod datasheet;
pub mod errors;
pub mod observability;
pub mod school;
pub mod uniqueness;

pub use access::{AccessDecisionEngine, AccessTarget, CreateContext, Decision, Operation};
pub use config::DatasheetConfig;
pub use datasheet::{Datasheet, DatasheetType, Stage, YearCode};
pub use errors::{CollaboratorError, CollaboratorResult};
pub use uniqueness::{UniquenessValidator, Validation};
