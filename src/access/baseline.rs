//! Generic entity access rules.
//!
//! Everything the school-scoping rules do not claim falls through to an
//! `EntityAccessBaseline`. The default, `OwnershipBaseline`, grants by
//! bundle-granular `any`/`own` permissions plus an administer permission.

use crate::config::DatasheetConfig;
use crate::datasheet::{Datasheet, DatasheetType};

use super::actor::{Actor, PermissionOracle};
use super::decision::{CacheDimensions, Decision, DenialReason};
use super::operation::Operation;
use super::permissions;

/// Fallback access rules for operations without a dedicated rule
pub trait EntityAccessBaseline: Send + Sync {
    fn create_access(
        &self,
        bundle: DatasheetType,
        actor: &Actor,
        grants: &dyn PermissionOracle,
    ) -> Decision;

    fn entity_access(
        &self,
        entity: &Datasheet,
        operation: &Operation,
        actor: &Actor,
        grants: &dyn PermissionOracle,
    ) -> Decision;
}

/// Permission and ownership based baseline
#[derive(Debug, Clone)]
pub struct OwnershipBaseline {
    admin_permission: String,
}

impl OwnershipBaseline {
    pub fn new(admin_permission: impl Into<String>) -> Self {
        Self {
            admin_permission: admin_permission.into(),
        }
    }

    pub fn from_config(config: &DatasheetConfig) -> Self {
        Self::new(config.admin_permission.clone())
    }

    pub fn admin_permission(&self) -> &str {
        &self.admin_permission
    }

    /// Allow on the `any` permission, or on the `own` permission for the owner
    fn any_or_own(
        &self,
        entity: &Datasheet,
        actor: &Actor,
        grants: &dyn PermissionOracle,
        any: &str,
        own: &str,
    ) -> Decision {
        if grants.has_permission(actor, any) {
            return Decision::allowed(CacheDimensions::new().per_permissions());
        }

        let owner_dims = CacheDimensions::new()
            .per_permissions()
            .per_user()
            .with_dependency(entity.cache_tag());

        if entity.is_owned_by(actor.id) && grants.has_permission(actor, own) {
            Decision::allowed(owner_dims)
        } else {
            Decision::denied(
                DenialReason::MissingPermission {
                    permission: any.to_string(),
                },
                owner_dims,
            )
        }
    }

    fn view_access(&self, entity: &Datasheet, actor: &Actor, grants: &dyn PermissionOracle) -> Decision {
        if !entity.published {
            let dims = CacheDimensions::new()
                .per_permissions()
                .per_user()
                .with_dependency(entity.cache_tag());
            let granted = entity.is_owned_by(actor.id)
                && grants.has_permission(actor, permissions::VIEW_OWN_UNPUBLISHED);
            return if granted {
                Decision::allowed(dims)
            } else {
                Decision::denied(
                    DenialReason::MissingPermission {
                        permission: permissions::VIEW_OWN_UNPUBLISHED.to_string(),
                    },
                    dims,
                )
            };
        }

        if grants.has_permission(actor, permissions::VIEW_ANY) {
            return Decision::allowed(CacheDimensions::new().per_permissions());
        }

        let bundle = entity.bundle;
        self.any_or_own(
            entity,
            actor,
            grants,
            &permissions::view_any(bundle),
            &permissions::view_own(bundle),
        )
    }
}

impl Default for OwnershipBaseline {
    fn default() -> Self {
        Self::from_config(&DatasheetConfig::default())
    }
}

impl EntityAccessBaseline for OwnershipBaseline {
    fn create_access(
        &self,
        bundle: DatasheetType,
        actor: &Actor,
        grants: &dyn PermissionOracle,
    ) -> Decision {
        let bundle_permission = permissions::create(bundle);
        let granted = grants.has_permission(actor, &self.admin_permission)
            || grants.has_permission(actor, permissions::CREATE_ANY)
            || grants.has_permission(actor, &bundle_permission);

        Decision::allowed_if_permission(granted, &bundle_permission)
    }

    fn entity_access(
        &self,
        entity: &Datasheet,
        operation: &Operation,
        actor: &Actor,
        grants: &dyn PermissionOracle,
    ) -> Decision {
        if grants.has_permission(actor, &self.admin_permission) {
            return Decision::allowed(CacheDimensions::new().per_permissions());
        }

        let bundle = entity.bundle;
        match operation {
            Operation::View => self.view_access(entity, actor, grants),
            Operation::Update => self.any_or_own(
                entity,
                actor,
                grants,
                &permissions::update_any(bundle),
                &permissions::update_own(bundle),
            ),
            Operation::Delete => self.any_or_own(
                entity,
                actor,
                grants,
                &permissions::delete_any(bundle),
                &permissions::delete_own(bundle),
            ),
            Operation::Create => self.create_access(bundle, actor, grants),
            // Revision operations only reach here through a custom engine; the
            // admin check above is their only baseline grant
            other => Decision::denied(
                DenialReason::UnsupportedOperation {
                    operation: other.to_string(),
                },
                CacheDimensions::new().per_permissions(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::actor::ActorGrants;
    use crate::datasheet::ActorId;

    fn sheet(bundle: DatasheetType, owner: u64) -> Datasheet {
        Datasheet::new(bundle, "Sheet", ActorId(owner)).unwrap()
    }

    #[test]
    fn test_admin_allows_everything() {
        let baseline = OwnershipBaseline::default();
        let admin = Actor::new(ActorId(1)).with_permission("administer datasheet entities");
        let entity = sheet(DatasheetType::Local, 2);

        for op in [Operation::View, Operation::Update, Operation::Delete, Operation::Other("x".into())] {
            assert!(baseline.entity_access(&entity, &op, &admin, &ActorGrants).is_allowed());
        }
        assert!(baseline
            .create_access(DatasheetType::School, &admin, &ActorGrants)
            .is_allowed());
    }

    #[test]
    fn test_create_by_bundle_or_global_permission() {
        let baseline = OwnershipBaseline::default();
        let bundle = Actor::new(ActorId(1)).with_permission("create local datasheet");
        let global = Actor::new(ActorId(2)).with_permission("create datasheet");
        let none = Actor::new(ActorId(3));

        assert!(baseline.create_access(DatasheetType::Local, &bundle, &ActorGrants).is_allowed());
        assert!(baseline.create_access(DatasheetType::National, &bundle, &ActorGrants).is_denied());
        assert!(baseline.create_access(DatasheetType::National, &global, &ActorGrants).is_allowed());
        assert!(baseline.create_access(DatasheetType::Local, &none, &ActorGrants).is_denied());
    }

    #[test]
    fn test_update_own_requires_ownership() {
        let baseline = OwnershipBaseline::default();
        let actor = Actor::new(ActorId(5)).with_permission("update own national datasheet");

        let own = sheet(DatasheetType::National, 5);
        let other = sheet(DatasheetType::National, 6);

        let allowed = baseline.entity_access(&own, &Operation::Update, &actor, &ActorGrants);
        assert!(allowed.is_allowed());
        assert!(allowed.cache.user);

        let denied = baseline.entity_access(&other, &Operation::Update, &actor, &ActorGrants);
        assert!(denied.is_denied());
    }

    #[test]
    fn test_delete_any() {
        let baseline = OwnershipBaseline::default();
        let actor = Actor::new(ActorId(5)).with_permission("delete any local datasheet");
        let entity = sheet(DatasheetType::Local, 9);

        assert!(baseline.entity_access(&entity, &Operation::Delete, &actor, &ActorGrants).is_allowed());
    }

    #[test]
    fn test_unpublished_view_requires_owner_permission() {
        let baseline = OwnershipBaseline::default();
        let viewer = Actor::new(ActorId(5)).with_permission("view datasheet");
        let owner = Actor::new(ActorId(6)).with_permission("view own unpublished datasheet");
        let entity = sheet(DatasheetType::National, 6).with_published(false);

        assert!(baseline.entity_access(&entity, &Operation::View, &viewer, &ActorGrants).is_denied());
        assert!(baseline.entity_access(&entity, &Operation::View, &owner, &ActorGrants).is_allowed());
    }

    #[test]
    fn test_published_view() {
        let baseline = OwnershipBaseline::default();
        let viewer = Actor::new(ActorId(5)).with_permission("view any local datasheet");
        let entity = sheet(DatasheetType::Local, 6);

        assert!(baseline.entity_access(&entity, &Operation::View, &viewer, &ActorGrants).is_allowed());
        let stranger = Actor::new(ActorId(7));
        assert!(baseline.entity_access(&entity, &Operation::View, &stranger, &ActorGrants).is_denied());
    }

    #[test]
    fn test_unknown_operation_denied() {
        let baseline = OwnershipBaseline::default();
        let actor = Actor::new(ActorId(5)).with_permission("view datasheet");
        let entity = sheet(DatasheetType::Local, 5);

        let decision = baseline.entity_access(&entity, &Operation::Other("publish".into()), &actor, &ActorGrants);
        assert!(matches!(
            decision.reason,
            Some(DenialReason::UnsupportedOperation { .. })
        ));
    }
}
