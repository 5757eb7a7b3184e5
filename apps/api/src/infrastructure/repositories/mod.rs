// Repository implementations (data access layer)
// Adapters that implement the domain repository ports

pub mod memory;
pub mod postgres_asset_repository;
pub mod postgres_employee_repository;
pub mod postgres_ledger_repository;
pub mod postgres_user_repository;

pub use memory::InMemoryStore;
pub use postgres_asset_repository::PostgresAssetRepository;
pub use postgres_employee_repository::PostgresEmployeeRepository;
pub use postgres_ledger_repository::{PostgresExpenseRepository, PostgresIncomeRepository};
pub use postgres_user_repository::PostgresUserRepository;

use uuid::Uuid;

use crate::domain::repositories::StoreError;

/// SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::Conflict(db.message().to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Maps a row that fails domain parsing to `StoreError::Corrupt`
pub(crate) fn corrupt(entity: &'static str, id: Uuid) -> impl Fn(String) -> StoreError {
    move |reason| StoreError::Corrupt { entity, id, reason }
}

/// Fails with `NotFound` when a statement touched no row
pub(crate) fn expect_one(
    rows_affected: u64,
    entity: &'static str,
    id: Uuid,
) -> Result<(), StoreError> {
    if rows_affected == 0 {
        Err(StoreError::NotFound { entity, id })
    } else {
        Ok(())
    }
}
