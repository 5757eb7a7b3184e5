// Record store ports
// Implemented by the PostgreSQL adapters and the in-memory store

pub mod asset_repository;
pub mod employee_repository;
pub mod error;
pub mod ledger_repository;
pub mod user_repository;

pub use asset_repository::{AssetFilter, AssetRepository};
pub use employee_repository::{EmployeeFilter, EmployeeRepository};
pub use error::{StoreError, StoreResult};
pub use ledger_repository::{ExpenseFilter, ExpenseRepository, IncomeFilter, IncomeRepository};
pub use user_repository::UserRepository;
