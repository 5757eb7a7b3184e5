use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a user account
///
/// Roles only seed the permission matrix; access checks always read the
/// matrix (admins excepted, see [`crate::auth::permissions::authorize`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            other => Err(format!(
                "Invalid role: {} (expected admin, manager or employee)",
                other
            )),
        }
    }
}

/// Resources guarded by the permission matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Employees,
    Assets,
    Expenses,
    Income,
    Analytics,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Employees => "employees",
            Resource::Assets => "assets",
            Resource::Expenses => "expenses",
            Resource::Income => "income",
            Resource::Analytics => "analytics",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// CRUD flags for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudPermissions {
    pub view: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl CrudPermissions {
    const fn new(view: bool, create: bool, update: bool, delete: bool) -> Self {
        Self {
            view,
            create,
            update,
            delete,
        }
    }

    fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPermission {
    pub view: bool,
}

/// Per-resource permission flags of a user
///
/// Missing keys deserialize to `false`, so a partially specified matrix
/// never grants more than it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionMatrix {
    pub employees: CrudPermissions,
    pub assets: CrudPermissions,
    pub expenses: CrudPermissions,
    pub income: CrudPermissions,
    pub analytics: ViewPermission,
}

impl PermissionMatrix {
    /// Derives the default matrix for a role
    ///
    /// # Example
    /// ```
    /// use office_api::domain::user::role::{Action, PermissionMatrix, Resource, Role};
    ///
    /// let matrix = PermissionMatrix::for_role(Role::Manager);
    /// assert!(matrix.allows(Resource::Expenses, Action::Update));
    /// assert!(!matrix.allows(Resource::Expenses, Action::Delete));
    /// ```
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => {
                let all = CrudPermissions::new(true, true, true, true);
                Self {
                    employees: all,
                    assets: all,
                    expenses: all,
                    income: all,
                    analytics: ViewPermission { view: true },
                }
            }
            Role::Manager => {
                let no_delete = CrudPermissions::new(true, true, true, false);
                Self {
                    employees: no_delete,
                    assets: no_delete,
                    expenses: no_delete,
                    income: no_delete,
                    analytics: ViewPermission { view: true },
                }
            }
            Role::Employee => {
                let view_only = CrudPermissions::new(true, false, false, false);
                Self {
                    employees: view_only,
                    assets: view_only,
                    expenses: CrudPermissions::new(true, true, false, false),
                    income: view_only,
                    analytics: ViewPermission { view: false },
                }
            }
        }
    }

    /// Whether the matrix grants `action` on `resource`
    ///
    /// Analytics is view-only: any other action on it is refused.
    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        match resource {
            Resource::Employees => self.employees.allows(action),
            Resource::Assets => self.assets.allows(action),
            Resource::Expenses => self.expenses.allows(action),
            Resource::Income => self.income.allows(action),
            Resource::Analytics => action == Action::View && self.analytics.view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCES: [Resource; 4] = [
        Resource::Employees,
        Resource::Assets,
        Resource::Expenses,
        Resource::Income,
    ];
    const ACTIONS: [Action; 4] = [Action::View, Action::Create, Action::Update, Action::Delete];

    #[test]
    fn admin_gets_everything() {
        let matrix = PermissionMatrix::for_role(Role::Admin);
        for resource in RESOURCES {
            for action in ACTIONS {
                assert!(matrix.allows(resource, action), "{resource} {action}");
            }
        }
        assert!(matrix.allows(Resource::Analytics, Action::View));
    }

    #[test]
    fn manager_cannot_delete() {
        let matrix = PermissionMatrix::for_role(Role::Manager);
        for resource in RESOURCES {
            assert!(matrix.allows(resource, Action::View));
            assert!(matrix.allows(resource, Action::Create));
            assert!(matrix.allows(resource, Action::Update));
            assert!(!matrix.allows(resource, Action::Delete));
        }
        assert!(matrix.allows(Resource::Analytics, Action::View));
    }

    #[test]
    fn employee_can_only_view_and_file_expenses() {
        let matrix = PermissionMatrix::for_role(Role::Employee);
        for resource in RESOURCES {
            assert!(matrix.allows(resource, Action::View));
            assert!(!matrix.allows(resource, Action::Update));
            assert!(!matrix.allows(resource, Action::Delete));
        }
        assert!(matrix.allows(Resource::Expenses, Action::Create));
        assert!(!matrix.allows(Resource::Income, Action::Create));
        assert!(!matrix.allows(Resource::Analytics, Action::View));
    }

    #[test]
    fn analytics_is_view_only() {
        let matrix = PermissionMatrix::for_role(Role::Admin);
        assert!(!matrix.allows(Resource::Analytics, Action::Create));
        assert!(!matrix.allows(Resource::Analytics, Action::Delete));
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Manager, Role::Employee] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn partial_matrix_defaults_to_denied() {
        let matrix: PermissionMatrix =
            serde_json::from_str(r#"{"income": {"view": true}}"#).unwrap();
        assert!(matrix.allows(Resource::Income, Action::View));
        assert!(!matrix.allows(Resource::Income, Action::Create));
        assert!(!matrix.allows(Resource::Employees, Action::View));
    }
}
