//! # Datasheet Access Control
//!
//! Decides whether an actor may view, create, update or delete a datasheet,
//! or work with its revisions.
//!
//! ## Invariants
//! - A global permission always wins over school scoping
//! - Auditors only reach school datasheets of schools they are assigned to
//! - Auditors only update school datasheets of the working academic year
//! - Revision operations depend on their dedicated permission alone
//! - Collaborator faults never produce an allow

mod actor;
mod baseline;
mod decision;
mod engine;
pub mod errors;
mod operation;
pub mod permissions;

pub use actor::{Actor, ActorGrants, PermissionOracle, RoleOracle};
pub use baseline::{EntityAccessBaseline, OwnershipBaseline};
pub use decision::{CacheDimensions, Decision, DenialReason, WORKING_YEAR_TAG};
pub use engine::{AccessDecisionEngine, AccessTarget, CreateContext};
pub use errors::{AccessError, AccessResult};
pub use operation::Operation;
