// PostgreSQL adapters for the expense and income ledgers

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{corrupt, expect_one};
use crate::domain::ledger::{Expense, Income};
use crate::domain::period::DateRange;
use crate::domain::repositories::{
    ExpenseFilter, ExpenseRepository, IncomeFilter, IncomeRepository, StoreError, StoreResult,
};

const EXPENSE_COLUMNS: &str = "id, title, amount, category, date, payment_method, receipt, \
    notes, approved_by, recurring, recurring_period, created_at, updated_at";

const INCOME_COLUMNS: &str = "id, title, amount, category, date, client, payment_method, \
    receipt_number, notes, received_by, recurring, recurring_period, taxable, created_at, \
    updated_at";

/// Inclusive date bounds ($1, $2) and category ($3)
const LEDGER_FILTER: &str = "($1::TIMESTAMPTZ IS NULL OR date >= $1) \
    AND ($2::TIMESTAMPTZ IS NULL OR date <= $2) \
    AND ($3::TEXT IS NULL OR category = $3)";

fn bounds(range: Option<DateRange>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match range {
        Some(range) => (Some(range.start()), Some(range.end())),
        None => (None, None),
    }
}

#[derive(FromRow)]
struct ExpenseRow {
    id: Uuid,
    title: String,
    amount: f64,
    category: String,
    date: DateTime<Utc>,
    payment_method: String,
    receipt: Option<String>,
    notes: Option<String>,
    approved_by: Option<Uuid>,
    recurring: bool,
    recurring_period: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = StoreError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        let invalid = corrupt("Expense", row.id);
        Ok(Expense {
            category: row.category.parse().map_err(&invalid)?,
            payment_method: row.payment_method.parse().map_err(&invalid)?,
            recurring_period: row.recurring_period.parse().map_err(&invalid)?,
            id: row.id,
            title: row.title,
            amount: row.amount,
            date: row.date,
            receipt: row.receipt,
            notes: row.notes,
            approved_by: row.approved_by,
            recurring: row.recurring,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct IncomeRow {
    id: Uuid,
    title: String,
    amount: f64,
    category: String,
    date: DateTime<Utc>,
    client: Option<String>,
    payment_method: String,
    receipt_number: Option<String>,
    notes: Option<String>,
    received_by: Option<Uuid>,
    recurring: bool,
    recurring_period: String,
    taxable: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IncomeRow> for Income {
    type Error = StoreError;

    fn try_from(row: IncomeRow) -> Result<Self, Self::Error> {
        let invalid = corrupt("Income", row.id);
        Ok(Income {
            category: row.category.parse().map_err(&invalid)?,
            payment_method: row.payment_method.parse().map_err(&invalid)?,
            recurring_period: row.recurring_period.parse().map_err(&invalid)?,
            id: row.id,
            title: row.title,
            amount: row.amount,
            date: row.date,
            client: row.client,
            receipt_number: row.receipt_number,
            notes: row.notes,
            received_by: row.received_by,
            recurring: row.recurring,
            taxable: row.taxable,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PostgresExpenseRepository {
    pool: PgPool,
}

impl PostgresExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepository for PostgresExpenseRepository {
    async fn create(&self, expense: &Expense) -> StoreResult<()> {
        let query = format!(
            "INSERT INTO expenses ({EXPENSE_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
        );
        sqlx::query(&query)
            .bind(expense.id)
            .bind(&expense.title)
            .bind(expense.amount)
            .bind(expense.category.as_str())
            .bind(expense.date)
            .bind(expense.payment_method.as_str())
            .bind(&expense.receipt)
            .bind(&expense.notes)
            .bind(expense.approved_by)
            .bind(expense.recurring)
            .bind(expense.recurring_period.as_str())
            .bind(expense.created_at)
            .bind(expense.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Expense>> {
        let query = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = $1");
        sqlx::query_as::<_, ExpenseRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Expense::try_from)
            .transpose()
    }

    async fn find(&self, filter: &ExpenseFilter) -> StoreResult<Vec<Expense>> {
        let (start, end) = bounds(filter.range);
        let query = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE {LEDGER_FILTER} ORDER BY date DESC"
        );
        sqlx::query_as::<_, ExpenseRow>(&query)
            .bind(start)
            .bind(end)
            .bind(filter.category.map(|c| c.as_str()))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    async fn update(&self, expense: &Expense) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE expenses
             SET title = $2, amount = $3, category = $4, date = $5, payment_method = $6,
                 receipt = $7, notes = $8, approved_by = $9, recurring = $10,
                 recurring_period = $11, updated_at = $12
             WHERE id = $1",
        )
        .bind(expense.id)
        .bind(&expense.title)
        .bind(expense.amount)
        .bind(expense.category.as_str())
        .bind(expense.date)
        .bind(expense.payment_method.as_str())
        .bind(&expense.receipt)
        .bind(&expense.notes)
        .bind(expense.approved_by)
        .bind(expense.recurring)
        .bind(expense.recurring_period.as_str())
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;

        expect_one(result.rows_affected(), "Expense", expense.id)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected(), "Expense", id)
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Expense>> {
        let query =
            format!("SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, ExpenseRow>(&query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }
}

pub struct PostgresIncomeRepository {
    pool: PgPool,
}

impl PostgresIncomeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncomeRepository for PostgresIncomeRepository {
    async fn create(&self, income: &Income) -> StoreResult<()> {
        let query = format!(
            "INSERT INTO income ({INCOME_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"
        );
        sqlx::query(&query)
            .bind(income.id)
            .bind(&income.title)
            .bind(income.amount)
            .bind(income.category.as_str())
            .bind(income.date)
            .bind(&income.client)
            .bind(income.payment_method.as_str())
            .bind(&income.receipt_number)
            .bind(&income.notes)
            .bind(income.received_by)
            .bind(income.recurring)
            .bind(income.recurring_period.as_str())
            .bind(income.taxable)
            .bind(income.created_at)
            .bind(income.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Income>> {
        let query = format!("SELECT {INCOME_COLUMNS} FROM income WHERE id = $1");
        sqlx::query_as::<_, IncomeRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Income::try_from)
            .transpose()
    }

    async fn find(&self, filter: &IncomeFilter) -> StoreResult<Vec<Income>> {
        let (start, end) = bounds(filter.range);
        let query = format!(
            "SELECT {INCOME_COLUMNS} FROM income
             WHERE {LEDGER_FILTER}
               AND ($4::TEXT IS NULL OR POSITION(LOWER($4) IN LOWER(client)) > 0)
             ORDER BY date DESC"
        );
        sqlx::query_as::<_, IncomeRow>(&query)
            .bind(start)
            .bind(end)
            .bind(filter.category.map(|c| c.as_str()))
            .bind(&filter.client)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Income::try_from)
            .collect()
    }

    async fn update(&self, income: &Income) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE income
             SET title = $2, amount = $3, category = $4, date = $5, client = $6,
                 payment_method = $7, receipt_number = $8, notes = $9, received_by = $10,
                 recurring = $11, recurring_period = $12, taxable = $13, updated_at = $14
             WHERE id = $1",
        )
        .bind(income.id)
        .bind(&income.title)
        .bind(income.amount)
        .bind(income.category.as_str())
        .bind(income.date)
        .bind(&income.client)
        .bind(income.payment_method.as_str())
        .bind(&income.receipt_number)
        .bind(&income.notes)
        .bind(income.received_by)
        .bind(income.recurring)
        .bind(income.recurring_period.as_str())
        .bind(income.taxable)
        .bind(income.updated_at)
        .execute(&self.pool)
        .await?;

        expect_one(result.rows_affected(), "Income", income.id)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM income WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        expect_one(result.rows_affected(), "Income", id)
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Income>> {
        let query =
            format!("SELECT {INCOME_COLUMNS} FROM income ORDER BY created_at DESC LIMIT $1");
        sqlx::query_as::<_, IncomeRow>(&query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Income::try_from)
            .collect()
    }
}
