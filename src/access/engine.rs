//! Access decision engine for datasheets.
//!
//! Rules are evaluated in a fixed precedence, first match wins:
//!
//! 1. Revision operations, gated solely by their dedicated permission
//! 2. Create of a school datasheet by an auditor, gated by assignment to the
//!    target school before falling through to the baseline create rule
//! 3. View and update of school datasheets: global permission, else an
//!    assigned auditor (update additionally needs the `own` permission and
//!    a datasheet from the working year)
//! 4. Everything else, delegated to the `EntityAccessBaseline`
//!
//! The engine holds no mutable state; one instance may serve any number of
//! threads.

use std::sync::Arc;

use crate::config::DatasheetConfig;
use crate::datasheet::{Datasheet, DatasheetType, SchoolId};
use crate::observability::{log_event_with_fields, Event};
use crate::school::{
    AcademicYearOracle, AuditorAssignments, School, SchoolAssignmentOracle, SchoolLookup,
};

use super::actor::{Actor, ActorGrants, PermissionOracle, RoleOracle};
use super::baseline::{EntityAccessBaseline, OwnershipBaseline};
use super::decision::{CacheDimensions, Decision, DenialReason, WORKING_YEAR_TAG};
use super::errors::AccessResult;
use super::operation::Operation;
use super::permissions;

/// What an operation targets: a bundle (create) or an existing datasheet
#[derive(Debug, Clone, Copy)]
pub enum AccessTarget<'a> {
    Bundle(DatasheetType),
    Entity(&'a Datasheet),
}

impl AccessTarget<'_> {
    pub fn bundle(&self) -> DatasheetType {
        match self {
            AccessTarget::Bundle(bundle) => *bundle,
            AccessTarget::Entity(entity) => entity.bundle,
        }
    }

    fn describe(&self) -> String {
        match self {
            AccessTarget::Bundle(bundle) => format!("bundle:{}", bundle),
            AccessTarget::Entity(entity) => entity.cache_tag(),
        }
    }
}

/// Request context consulted when creating school datasheets
#[derive(Debug, Clone, Default)]
pub struct CreateContext {
    /// School bound by the current route, already loaded
    pub route_school: Option<School>,
    /// Raw `sid` query parameter
    pub sid: Option<String>,
}

impl CreateContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_route(school: School) -> Self {
        Self {
            route_school: Some(school),
            sid: None,
        }
    }

    pub fn from_query(sid: impl Into<String>) -> Self {
        Self {
            route_school: None,
            sid: Some(sid.into()),
        }
    }

    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }
}

/// Decides whether an actor may perform an operation on a datasheet
pub struct AccessDecisionEngine {
    auditor_role: String,
    schools: Arc<dyn SchoolLookup>,
    assignments: Arc<dyn SchoolAssignmentOracle>,
    years: Arc<dyn AcademicYearOracle>,
    grants: Arc<dyn PermissionOracle>,
    roles: Arc<dyn RoleOracle>,
    baseline: Arc<dyn EntityAccessBaseline>,
}

impl AccessDecisionEngine {
    /// Creates an engine with default collaborators for everything except
    /// the school directory and the academic calendar.
    pub fn new(
        config: &DatasheetConfig,
        schools: Arc<dyn SchoolLookup>,
        years: Arc<dyn AcademicYearOracle>,
    ) -> Self {
        Self {
            auditor_role: config.auditor_role.clone(),
            schools,
            assignments: Arc::new(AuditorAssignments),
            years,
            grants: Arc::new(ActorGrants),
            roles: Arc::new(ActorGrants),
            baseline: Arc::new(OwnershipBaseline::from_config(config)),
        }
    }

    pub fn with_assignments(mut self, assignments: Arc<dyn SchoolAssignmentOracle>) -> Self {
        self.assignments = assignments;
        self
    }

    pub fn with_permission_oracle(mut self, grants: Arc<dyn PermissionOracle>) -> Self {
        self.grants = grants;
        self
    }

    pub fn with_role_oracle(mut self, roles: Arc<dyn RoleOracle>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_baseline(mut self, baseline: Arc<dyn EntityAccessBaseline>) -> Self {
        self.baseline = baseline;
        self
    }

    /// Decides an operation against a bundle or an existing datasheet.
    ///
    /// `context` is only consulted for create against a bundle; create
    /// against an existing datasheet uses that datasheet's school.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Collaborator` if a school lookup or the working
    /// year lookup fails. Callers must treat that as a denial; see
    /// [`decide_or_deny`](Self::decide_or_deny).
    pub fn decide(
        &self,
        operation: &Operation,
        actor: &Actor,
        target: AccessTarget<'_>,
        context: &CreateContext,
    ) -> AccessResult<Decision> {
        let decision = match (operation, target) {
            (op, _) if op.is_revision_operation() => self.revision_access(op, actor),
            (Operation::Create, AccessTarget::Bundle(bundle)) => {
                self.create_access(bundle, actor, context)?
            }
            (op, AccessTarget::Entity(entity)) => self.entity_access(entity, op, actor)?,
            (op, AccessTarget::Bundle(_)) => Decision::denied(
                DenialReason::RequiresEntity {
                    operation: op.to_string(),
                },
                CacheDimensions::new(),
            ),
        };

        log_decision(operation, actor, &target, &decision);
        Ok(decision)
    }

    /// Like [`decide`](Self::decide), but folds collaborator faults into a
    /// denial.
    pub fn decide_or_deny(
        &self,
        operation: &Operation,
        actor: &Actor,
        target: AccessTarget<'_>,
        context: &CreateContext,
    ) -> Decision {
        match self.decide(operation, actor, target, context) {
            Ok(decision) => decision,
            Err(err) => {
                let actor_id = actor.id.to_string();
                let message = err.to_string();
                log_event_with_fields(
                    Event::AccessFault,
                    &[
                        ("actor", actor_id.as_str()),
                        ("error", message.as_str()),
                        ("operation", operation.as_str()),
                        ("target", target.describe().as_str()),
                    ],
                );
                Decision::denied(
                    DenialReason::CollaboratorUnavailable { message },
                    CacheDimensions::new().per_user(),
                )
            }
        }
    }

    /// Create access for a bundle.
    ///
    /// Auditors creating a school datasheet must be assigned to the target
    /// school, taken from the route if bound there, else from the `sid`
    /// query parameter. A blank `sid` counts as absent. All other cases go
    /// straight to the baseline.
    pub fn create_access(
        &self,
        bundle: DatasheetType,
        actor: &Actor,
        context: &CreateContext,
    ) -> AccessResult<Decision> {
        if bundle == DatasheetType::School && self.is_auditor(actor) {
            let school = match self.resolve_create_school(context)? {
                Ok(school) => school,
                Err(reason) => {
                    return Ok(Decision::denied(reason, CacheDimensions::new().per_user()));
                }
            };

            if !self.assignments.is_assigned(&school, actor.id) {
                return Ok(Decision::denied(
                    DenialReason::NotAssignedToCreate { school: school.id },
                    CacheDimensions::new()
                        .per_user()
                        .per_route()
                        .with_dependency(school.cache_tag()),
                ));
            }
        }

        Ok(self.baseline.create_access(bundle, actor, self.grants.as_ref()))
    }

    /// Access to an existing datasheet
    pub fn entity_access(
        &self,
        entity: &Datasheet,
        operation: &Operation,
        actor: &Actor,
    ) -> AccessResult<Decision> {
        if operation.is_revision_operation() {
            return Ok(self.revision_access(operation, actor));
        }

        match operation {
            Operation::View | Operation::Update if entity.bundle == DatasheetType::School => {
                self.school_access(entity, operation, actor)
            }
            Operation::Create => {
                let context = CreateContext {
                    route_school: None,
                    sid: entity.school.map(|id| id.to_string()),
                };
                self.create_access(entity.bundle, actor, &context)
            }
            _ => Ok(self
                .baseline
                .entity_access(entity, operation, actor, self.grants.as_ref())),
        }
    }

    fn revision_access(&self, operation: &Operation, actor: &Actor) -> Decision {
        match operation.revision_permission() {
            Some(permission) => Decision::allowed_if_permission(
                self.grants.has_permission(actor, permission),
                permission,
            ),
            None => Decision::denied(
                DenialReason::UnsupportedOperation {
                    operation: operation.to_string(),
                },
                CacheDimensions::new().per_permissions(),
            ),
        }
    }

    /// View/update rules for school datasheets
    fn school_access(
        &self,
        entity: &Datasheet,
        operation: &Operation,
        actor: &Actor,
    ) -> AccessResult<Decision> {
        let global = match operation {
            Operation::View => permissions::VIEW_ANY,
            _ => permissions::UPDATE_ANY_SCHOOL,
        };

        // Global permission always wins over school scoping
        if self.grants.has_permission(actor, global) {
            return Ok(Decision::allowed(CacheDimensions::new().per_permissions()));
        }

        if !self.is_auditor(actor) {
            return Ok(Decision::denied(
                DenialReason::MissingPermission {
                    permission: global.to_string(),
                },
                CacheDimensions::new().per_permissions(),
            ));
        }

        let scoped = CacheDimensions::new()
            .per_permissions()
            .per_user()
            .with_dependency(entity.cache_tag());

        let Some(school_id) = entity.school else {
            return Ok(Decision::denied(DenialReason::NoSchoolReference, scoped));
        };

        let Some(school) = self.schools.by_id(school_id)? else {
            return Ok(Decision::denied(
                DenialReason::SchoolNotFound { school: school_id },
                scoped,
            ));
        };
        let scoped = scoped.with_dependency(school.cache_tag());

        if !self.assignments.is_assigned(&school, actor.id) {
            return Ok(Decision::denied(
                DenialReason::NotAssigned { school: school_id },
                scoped,
            ));
        }

        if *operation == Operation::View {
            return Ok(Decision::allowed(scoped));
        }

        if !self.grants.has_permission(actor, permissions::UPDATE_OWN_SCHOOL) {
            return Ok(Decision::denied(
                DenialReason::MissingPermission {
                    permission: permissions::UPDATE_OWN_SCHOOL.to_string(),
                },
                scoped,
            ));
        }

        let working_year = self.years.working_year()?;
        let scoped = scoped.with_dependency(WORKING_YEAR_TAG);

        match entity.year {
            Some(year) if year == working_year => Ok(Decision::allowed(scoped)),
            year => Ok(Decision::denied(
                DenialReason::StaleYear { year, working_year },
                scoped,
            )),
        }
    }

    /// Outer `Err` is a collaborator fault, inner `Err` a denial reason
    fn resolve_create_school(
        &self,
        context: &CreateContext,
    ) -> AccessResult<Result<School, DenialReason>> {
        if let Some(school) = &context.route_school {
            return Ok(Ok(school.clone()));
        }

        let Some(sid) = context.sid.as_deref().filter(|sid| !sid.trim().is_empty()) else {
            return Ok(Err(DenialReason::NoContext));
        };

        let invalid = || DenialReason::InvalidSchool {
            sid: sid.to_string(),
        };

        let Ok(id) = sid.trim().parse::<u64>() else {
            return Ok(Err(invalid()));
        };

        match self.schools.by_id(SchoolId(id))? {
            Some(school) => Ok(Ok(school)),
            None => Ok(Err(invalid())),
        }
    }

    fn is_auditor(&self, actor: &Actor) -> bool {
        self.roles.has_role(actor, &self.auditor_role)
    }
}

fn log_decision(operation: &Operation, actor: &Actor, target: &AccessTarget<'_>, decision: &Decision) {
    let actor_id = actor.id.to_string();
    let target = target.describe();

    match decision.message() {
        None => log_event_with_fields(
            Event::AccessAllowed,
            &[
                ("actor", actor_id.as_str()),
                ("operation", operation.as_str()),
                ("target", target.as_str()),
            ],
        ),
        Some(reason) => log_event_with_fields(
            Event::AccessDenied,
            &[
                ("actor", actor_id.as_str()),
                ("operation", operation.as_str()),
                ("reason", reason.as_str()),
                ("target", target.as_str()),
            ],
        ),
    }
}
