// Shared application state
// Repository ports behind trait objects so handlers never see the backend

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::domain::repositories::{
    AssetRepository, EmployeeRepository, ExpenseRepository, IncomeRepository, UserRepository,
};
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresAssetRepository, PostgresEmployeeRepository, PostgresExpenseRepository,
    PostgresIncomeRepository, PostgresUserRepository,
};
use crate::reporting::ReportingEngine;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub assets: Arc<dyn AssetRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,
    pub income: Arc<dyn IncomeRepository>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn postgres(pool: PgPool, auth: AuthConfig) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            employees: Arc::new(PostgresEmployeeRepository::new(pool.clone())),
            assets: Arc::new(PostgresAssetRepository::new(pool.clone())),
            expenses: Arc::new(PostgresExpenseRepository::new(pool.clone())),
            income: Arc::new(PostgresIncomeRepository::new(pool)),
            auth: Arc::new(auth),
        }
    }

    /// All repositories served by one fresh in-memory store
    pub fn in_memory(auth: AuthConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            employees: store.clone(),
            assets: store.clone(),
            expenses: store.clone(),
            income: store,
            auth: Arc::new(auth),
        }
    }

    pub fn reporting(&self) -> ReportingEngine {
        ReportingEngine::new(
            self.employees.clone(),
            self.assets.clone(),
            self.expenses.clone(),
            self.income.clone(),
        )
    }
}
