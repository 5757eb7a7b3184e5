use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreResult;
use crate::domain::employee::Employee;

/// Equality predicates for employee listings
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        self.department
            .as_deref()
            .map_or(true, |department| employee.department == department)
            && self.is_active.map_or(true, |active| employee.is_active == active)
    }
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Insert an employee; a taken email is a `Conflict`
    async fn create(&self, employee: &Employee) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Employee>>;

    /// Employees matching the filter, ordered by name
    async fn find(&self, filter: &EmployeeFilter) -> StoreResult<Vec<Employee>>;

    async fn update(&self, employee: &Employee) -> StoreResult<()>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn count(&self, filter: &EmployeeFilter) -> StoreResult<u64>;

    /// Most recently created employees, newest first
    async fn recent(&self, limit: usize) -> StoreResult<Vec<Employee>>;
}
