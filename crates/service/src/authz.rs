//! Caller identity and capability checks.

use serde::Serialize;
use uuid::Uuid;

pub use models::permission::Permission;
use models::user::Role;

use crate::auth::domain::AuthUser;
use crate::errors::ServiceError;

/// The authenticated caller of a request.
#[derive(Clone, Debug, Serialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn is_staff(&self) -> bool { self.role.is_staff() }

    pub fn can(&self, perm: Permission) -> bool { self.role.grants(perm) }

    pub fn require(&self, perm: Permission) -> Result<(), ServiceError> {
        if self.can(perm) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden("You do not have permission to perform this action.".into()))
        }
    }
}

impl From<AuthUser> for Actor {
    fn from(u: AuthUser) -> Self {
        Self { user_id: u.id, tenant_id: u.tenant_id, username: u.username, role: u.role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor { user_id: Uuid::new_v4(), tenant_id: Uuid::new_v4(), username: "x".into(), role }
    }

    #[test]
    fn require_maps_to_forbidden() {
        assert!(matches!(actor(Role::User).require(Permission::ManageCatalog), Err(ServiceError::Forbidden(_))));
        assert!(actor(Role::Manager).require(Permission::ManageCatalog).is_ok());
    }
}
