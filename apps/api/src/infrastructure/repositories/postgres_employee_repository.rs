use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{corrupt, expect_one};
use crate::domain::employee::Employee;
use crate::domain::repositories::{EmployeeFilter, EmployeeRepository, StoreError, StoreResult};
use crate::domain::user::Email;

const COLUMNS: &str = "id, name, position, department, email, phone, salary, join_date, \
    is_active, created_at, updated_at";

/// Optional-parameter predicate shared by `find` and `count`
const FILTER: &str = "($1::TEXT IS NULL OR department = $1) \
    AND ($2::BOOLEAN IS NULL OR is_active = $2)";

#[derive(FromRow)]
struct EmployeeRow {
    id: Uuid,
    name: String,
    position: String,
    department: String,
    email: String,
    phone: Option<String>,
    salary: f64,
    join_date: DateTime<Utc>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = StoreError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            email: Email::new(row.email).map_err(corrupt("Employee", row.id))?,
            id: row.id,
            name: row.name,
            position: row.position,
            department: row.department,
            phone: row.phone,
            salary: row.salary,
            join_date: row.join_date,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_employees(rows: Vec<EmployeeRow>) -> StoreResult<Vec<Employee>> {
    rows.into_iter().map(Employee::try_from).collect()
}

pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn create(&self, employee: &Employee) -> StoreResult<()> {
        let query = format!(
            "INSERT INTO employees ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        );
        sqlx::query(&query)
            .bind(employee.id)
            .bind(&employee.name)
            .bind(&employee.position)
            .bind(&employee.department)
            .bind(employee.email.as_str())
            .bind(&employee.phone)
            .bind(employee.salary)
            .bind(employee.join_date)
            .bind(employee.is_active)
            .bind(employee.created_at)
            .bind(employee.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Employee>> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Employee::try_from)
            .transpose()
    }

    async fn find(&self, filter: &EmployeeFilter) -> StoreResult<Vec<Employee>> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE {FILTER} ORDER BY name");
        let rows = sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(&filter.department)
            .bind(filter.is_active)
            .fetch_all(&self.pool)
            .await?;

        into_employees(rows)
    }

    async fn update(&self, employee: &Employee) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE employees
             SET name = $2, position = $3, department = $4, email = $5, phone = $6,
                 salary = $7, join_date = $8, is_active = $9, updated_at = $10
             WHERE id = $1",
        )
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.email.as_str())
        .bind(&employee.phone)
        .bind(employee.salary)
        .bind(employee.join_date)
        .bind(employee.is_active)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await?;

        expect_one(result.rows_affected(), "Employee", employee.id)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected(), "Employee", id)
    }

    async fn count(&self, filter: &EmployeeFilter) -> StoreResult<u64> {
        let query = format!("SELECT COUNT(*) FROM employees WHERE {FILTER}");
        let count: i64 = sqlx::query_scalar(&query)
            .bind(&filter.department)
            .bind(filter.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Employee>> {
        let query =
            format!("SELECT {COLUMNS} FROM employees ORDER BY created_at DESC LIMIT $1");
        let rows = sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        into_employees(rows)
    }
}
