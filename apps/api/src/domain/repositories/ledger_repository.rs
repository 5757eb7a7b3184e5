use async_trait::async_trait;
use uuid::Uuid;

use super::error::StoreResult;
use crate::domain::ledger::{Expense, ExpenseCategory, Income, IncomeCategory};
use crate::domain::period::DateRange;

/// Predicates for expense retrieval
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpenseFilter {
    pub range: Option<DateRange>,
    pub category: Option<ExpenseCategory>,
}

impl ExpenseFilter {
    pub fn in_range(range: DateRange) -> Self {
        Self {
            range: Some(range),
            category: None,
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.range.map_or(true, |range| range.contains(expense.date))
            && self.category.map_or(true, |category| expense.category == category)
    }
}

/// Predicates for income retrieval
///
/// `client` is a case-insensitive substring match.
#[derive(Debug, Clone, Default)]
pub struct IncomeFilter {
    pub range: Option<DateRange>,
    pub category: Option<IncomeCategory>,
    pub client: Option<String>,
}

impl IncomeFilter {
    pub fn in_range(range: DateRange) -> Self {
        Self {
            range: Some(range),
            ..Self::default()
        }
    }

    pub fn matches(&self, income: &Income) -> bool {
        let client_matches = match self.client.as_deref() {
            None => true,
            Some(needle) => income
                .client
                .as_deref()
                .map_or(false, |client| {
                    client.to_lowercase().contains(&needle.to_lowercase())
                }),
        };

        client_matches
            && self.range.map_or(true, |range| range.contains(income.date))
            && self.category.map_or(true, |category| income.category == category)
    }
}

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn create(&self, expense: &Expense) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Expense>>;

    /// Expenses matching the filter, newest date first
    async fn find(&self, filter: &ExpenseFilter) -> StoreResult<Vec<Expense>>;

    async fn update(&self, expense: &Expense) -> StoreResult<()>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Most recently created expenses, newest first
    async fn recent(&self, limit: usize) -> StoreResult<Vec<Expense>>;
}

#[async_trait]
pub trait IncomeRepository: Send + Sync {
    async fn create(&self, income: &Income) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Income>>;

    /// Income matching the filter, newest date first
    async fn find(&self, filter: &IncomeFilter) -> StoreResult<Vec<Income>>;

    async fn update(&self, income: &Income) -> StoreResult<()>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Most recently created income entries, newest first
    async fn recent(&self, limit: usize) -> StoreResult<Vec<Income>>;
}
