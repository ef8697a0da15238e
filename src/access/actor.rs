//! Actors and the oracles that answer role and permission questions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::datasheet::ActorId;

/// An account attempting an operation.
///
/// Roles and permissions are resolved outside the core; the engine only
/// reads them through `RoleOracle` and `PermissionOracle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl Actor {
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            roles: BTreeSet::new(),
            permissions: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions.extend(permissions.into_iter().map(Into::into));
        self
    }
}

/// Answers permission checks
pub trait PermissionOracle: Send + Sync {
    fn has_permission(&self, actor: &Actor, permission: &str) -> bool;
}

/// Answers role checks
pub trait RoleOracle: Send + Sync {
    fn has_role(&self, actor: &Actor, role: &str) -> bool;
}

/// Reads roles and permissions already resolved onto the `Actor`
#[derive(Debug, Default, Clone, Copy)]
pub struct ActorGrants;

impl PermissionOracle for ActorGrants {
    fn has_permission(&self, actor: &Actor, permission: &str) -> bool {
        actor.permissions.contains(permission)
    }
}

impl RoleOracle for ActorGrants {
    fn has_role(&self, actor: &Actor, role: &str) -> bool {
        actor.roles.contains(role)
    }
}
