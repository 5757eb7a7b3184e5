use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::role::{PermissionMatrix, Role};
use super::value_objects::Email;

/// Minimum accepted length for a plaintext password
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// User account
///
/// `password_hash` never leaves the service; API responses are built from
/// dedicated profile types.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    pub permissions: PermissionMatrix,
    pub is_active: bool,
    pub employee_id: Option<Uuid>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user whose permissions are derived from `role`
    ///
    /// # Errors
    /// Returns an error if the name is blank.
    pub fn new(
        name: impl Into<String>,
        email: Email,
        password_hash: String,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<Self, String> {
        let name = validate_name(name.into())?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            permissions: PermissionMatrix::for_role(role),
            is_active: true,
            employee_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Changes the role, re-deriving the permission matrix when it differs
    pub fn change_role(&mut self, role: Role) {
        if self.role != role {
            self.role = role;
            self.permissions = PermissionMatrix::for_role(role);
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), String> {
        self.name = validate_name(name.into())?;
        Ok(())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn validate_name(name: String) -> Result<String, String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    Ok(name)
}

/// Checks the plaintext password policy before hashing
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::role::{Action, Resource};

    fn sample(role: Role) -> User {
        User::new(
            "Dana Scully",
            Email::new("dana@office.com").unwrap(),
            "hash".to_string(),
            role,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn new_user_derives_permissions_from_role() {
        let user = sample(Role::Manager);
        assert_eq!(user.permissions, PermissionMatrix::for_role(Role::Manager));
        assert!(user.is_active);
        assert!(user.last_login.is_none());
    }

    #[test]
    fn blank_name_rejected() {
        let result = User::new(
            "   ",
            Email::new("x@office.com").unwrap(),
            "hash".to_string(),
            Role::Employee,
            Utc::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn role_change_rederives_matrix() {
        let mut user = sample(Role::Employee);
        assert!(!user.permissions.allows(Resource::Analytics, Action::View));

        user.change_role(Role::Admin);
        assert!(user.permissions.allows(Resource::Analytics, Action::View));
        assert!(user.is_admin());
    }

    #[test]
    fn same_role_keeps_overridden_matrix() {
        let mut user = sample(Role::Employee);
        user.permissions.analytics.view = true;

        user.change_role(Role::Employee);
        assert!(user.permissions.analytics.view);
    }

    #[test]
    fn password_policy() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
