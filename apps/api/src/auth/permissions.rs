// Permission gate
// Decides whether a principal may perform an action on a resource

use thiserror::Error;

use crate::domain::user::{Action, Resource, User};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionDenied {
    #[error("You do not have permission to {action} {resource}")]
    Missing { resource: Resource, action: Action },

    #[error("Role {role} is not authorized to access this resource")]
    Role { role: String },
}

/// Checks `user` against the permission matrix
///
/// Admins pass unconditionally; everyone else needs the matching flag.
pub fn authorize(user: &User, resource: Resource, action: Action) -> Result<(), PermissionDenied> {
    if user.is_admin() || user.permissions.allows(resource, action) {
        return Ok(());
    }

    tracing::debug!(user_id = %user.id, %resource, %action, "permission denied");
    Err(PermissionDenied::Missing { resource, action })
}

/// Restricts an operation to administrators
pub fn require_admin(user: &User) -> Result<(), PermissionDenied> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(PermissionDenied::Role {
            role: user.role.to_string(),
        })
    }
}
