// In-memory record store
// Backs every repository port with maps behind async locks. Used for
// local development (STORE_BACKEND=memory) and by the integration tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::asset::Asset;
use crate::domain::employee::Employee;
use crate::domain::ledger::{Expense, Income};
use crate::domain::repositories::{
    AssetFilter, AssetRepository, EmployeeFilter, EmployeeRepository, ExpenseFilter,
    ExpenseRepository, IncomeFilter, IncomeRepository, StoreError, StoreResult, UserRepository,
};
use crate::domain::user::{Email, User};

type Table<T> = RwLock<HashMap<Uuid, T>>;

#[derive(Default)]
pub struct InMemoryStore {
    users: Table<User>,
    employees: Table<Employee>,
    assets: Table<Asset>,
    expenses: Table<Expense>,
    income: Table<Income>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert<T>(table: &mut HashMap<Uuid, T>, id: Uuid, value: T) -> StoreResult<()> {
    if table.contains_key(&id) {
        return Err(StoreError::Conflict(format!("Record {} already exists", id)));
    }
    table.insert(id, value);
    Ok(())
}

fn replace<T>(
    table: &mut HashMap<Uuid, T>,
    entity: &'static str,
    id: Uuid,
    value: T,
) -> StoreResult<()> {
    match table.get_mut(&id) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(StoreError::NotFound { entity, id }),
    }
}

fn remove<T>(table: &mut HashMap<Uuid, T>, entity: &'static str, id: Uuid) -> StoreResult<()> {
    table
        .remove(&id)
        .map(|_| ())
        .ok_or(StoreError::NotFound { entity, id })
}

/// Newest `created_at` first, at most `limit` records
fn newest<T: Clone>(
    table: &HashMap<Uuid, T>,
    limit: usize,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut records: Vec<T> = table.values().cloned().collect();
    records.sort_by_key(|record| Reverse(created_at(record)));
    records.truncate(limit);
    records
}

fn email_taken<'a>(mut emails: impl Iterator<Item = &'a Email>, email: &Email) -> bool {
    emails.any(|existing| existing.as_str().eq_ignore_ascii_case(email.as_str()))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if email_taken(users.values().map(|u| &u.email), &user.email) {
            return Err(StoreError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }
        insert(&mut users, user.id, user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.as_str().eq_ignore_ascii_case(email.as_str()))
            .cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn update(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let others = users.values().filter(|u| u.id != user.id).map(|u| &u.email);
        if email_taken(others, &user.email) {
            return Err(StoreError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }
        replace(&mut users, "User", user.id, user.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        remove(&mut *self.users.write().await, "User", id)
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn update_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;
        user.last_login = Some(at);
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn create(&self, employee: &Employee) -> StoreResult<()> {
        let mut employees = self.employees.write().await;
        if email_taken(employees.values().map(|e| &e.email), &employee.email) {
            return Err(StoreError::Conflict(format!(
                "Employee with email {} already exists",
                employee.email
            )));
        }
        insert(&mut employees, employee.id, employee.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Employee>> {
        Ok(self.employees.read().await.get(&id).cloned())
    }

    async fn find(&self, filter: &EmployeeFilter) -> StoreResult<Vec<Employee>> {
        let mut employees: Vec<Employee> = self
            .employees
            .read()
            .await
            .values()
            .filter(|employee| filter.matches(employee))
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn update(&self, employee: &Employee) -> StoreResult<()> {
        let mut employees = self.employees.write().await;
        let others = employees
            .values()
            .filter(|e| e.id != employee.id)
            .map(|e| &e.email);
        if email_taken(others, &employee.email) {
            return Err(StoreError::Conflict(format!(
                "Employee with email {} already exists",
                employee.email
            )));
        }
        replace(&mut employees, "Employee", employee.id, employee.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        remove(&mut *self.employees.write().await, "Employee", id)
    }

    async fn count(&self, filter: &EmployeeFilter) -> StoreResult<u64> {
        Ok(self
            .employees
            .read()
            .await
            .values()
            .filter(|employee| filter.matches(employee))
            .count() as u64)
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Employee>> {
        Ok(newest(&*self.employees.read().await, limit, |e| e.created_at))
    }
}

#[async_trait]
impl AssetRepository for InMemoryStore {
    async fn create(&self, asset: &Asset) -> StoreResult<()> {
        insert(&mut *self.assets.write().await, asset.id, asset.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Asset>> {
        Ok(self.assets.read().await.get(&id).cloned())
    }

    async fn find(&self, filter: &AssetFilter) -> StoreResult<Vec<Asset>> {
        let mut assets: Vec<Asset> = self
            .assets
            .read()
            .await
            .values()
            .filter(|asset| filter.matches(asset))
            .cloned()
            .collect();
        assets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(assets)
    }

    async fn update(&self, asset: &Asset) -> StoreResult<()> {
        replace(&mut *self.assets.write().await, "Asset", asset.id, asset.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        remove(&mut *self.assets.write().await, "Asset", id)
    }

    async fn count(&self, filter: &AssetFilter) -> StoreResult<u64> {
        Ok(self
            .assets
            .read()
            .await
            .values()
            .filter(|asset| filter.matches(asset))
            .count() as u64)
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Asset>> {
        Ok(newest(&*self.assets.read().await, limit, |a| a.created_at))
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryStore {
    async fn create(&self, expense: &Expense) -> StoreResult<()> {
        insert(&mut *self.expenses.write().await, expense.id, expense.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Expense>> {
        Ok(self.expenses.read().await.get(&id).cloned())
    }

    async fn find(&self, filter: &ExpenseFilter) -> StoreResult<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .expenses
            .read()
            .await
            .values()
            .filter(|expense| filter.matches(expense))
            .cloned()
            .collect();
        expenses.sort_by_key(|expense| Reverse(expense.date));
        Ok(expenses)
    }

    async fn update(&self, expense: &Expense) -> StoreResult<()> {
        replace(
            &mut *self.expenses.write().await,
            "Expense",
            expense.id,
            expense.clone(),
        )
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        remove(&mut *self.expenses.write().await, "Expense", id)
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Expense>> {
        Ok(newest(&*self.expenses.read().await, limit, |e| e.created_at))
    }
}

#[async_trait]
impl IncomeRepository for InMemoryStore {
    async fn create(&self, income: &Income) -> StoreResult<()> {
        insert(&mut *self.income.write().await, income.id, income.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Income>> {
        Ok(self.income.read().await.get(&id).cloned())
    }

    async fn find(&self, filter: &IncomeFilter) -> StoreResult<Vec<Income>> {
        let mut income: Vec<Income> = self
            .income
            .read()
            .await
            .values()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        income.sort_by_key(|entry| Reverse(entry.date));
        Ok(income)
    }

    async fn update(&self, income: &Income) -> StoreResult<()> {
        replace(&mut *self.income.write().await, "Income", income.id, income.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        remove(&mut *self.income.write().await, "Income", id)
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Income>> {
        Ok(newest(&*self.income.read().await, limit, |i| i.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::NewEmployee;
    use crate::domain::ledger::{ExpenseCategory, NewExpense};
    use crate::domain::period::DateRange;
    use crate::domain::user::Role;
    use chrono::{Duration, TimeZone};

    fn employee(name: &str, email: &str, at: DateTime<Utc>) -> Employee {
        let input = NewEmployee {
            name: name.to_string(),
            position: "Analyst".to_string(),
            department: "Finance".to_string(),
            email: Email::new(email).unwrap(),
            phone: None,
            salary: 4200.0,
            join_date: None,
            is_active: None,
        };
        Employee::new(input, at).unwrap()
    }

    fn expense(amount: f64, date: DateTime<Utc>) -> Expense {
        let input = NewExpense {
            title: "Paper".to_string(),
            amount,
            category: ExpenseCategory::OfficeSupplies,
            date: Some(date),
            payment_method: None,
            receipt: None,
            notes: None,
            approved_by: None,
            recurring: false,
            recurring_period: None,
        };
        Expense::new(input, date).unwrap()
    }

    #[tokio::test]
    async fn duplicate_user_email_conflicts() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let first = User::new(
            "Ana",
            Email::normalized("ana@office.com").unwrap(),
            "hash".to_string(),
            Role::Admin,
            now,
        )
        .unwrap();
        let second = User::new(
            "Other Ana",
            Email::new("ANA@office.com").unwrap(),
            "hash".to_string(),
            Role::Employee,
            now,
        )
        .unwrap();

        UserRepository::create(&store, &first).await.unwrap();
        let result = UserRepository::create(&store, &second).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert_eq!(UserRepository::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn updating_missing_record_is_not_found() {
        let store = InMemoryStore::new();
        let ghost = employee("Ghost", "ghost@office.com", Utc::now());

        let result = EmployeeRepository::update(&store, &ghost).await;
        assert!(matches!(result, Err(StoreError::NotFound { entity: "Employee", .. })));
    }

    #[tokio::test]
    async fn recent_returns_newest_first() {
        let store = InMemoryStore::new();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        for (i, name) in ["Ada", "Ben", "Cy"].iter().enumerate() {
            let hire = employee(name, &format!("{}@office.com", name.to_lowercase()), base + Duration::days(i as i64));
            EmployeeRepository::create(&store, &hire).await.unwrap();
        }

        let recent = EmployeeRepository::recent(&store, 2).await.unwrap();
        let names: Vec<&str> = recent.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Cy", "Ben"]);
    }

    #[tokio::test]
    async fn ledger_range_is_inclusive_and_sorted_newest_first() {
        let store = InMemoryStore::new();
        let jan_1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let jan_31 = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let feb_1 = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        for (amount, date) in [(10.0, jan_1), (20.0, jan_31), (30.0, feb_1)] {
            ExpenseRepository::create(&store, &expense(amount, date)).await.unwrap();
        }

        let range = DateRange::new(jan_1, jan_31).unwrap();
        let found = ExpenseRepository::find(&store, &ExpenseFilter::in_range(range))
            .await
            .unwrap();
        let amounts: Vec<f64> = found.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![20.0, 10.0]);
    }
}
