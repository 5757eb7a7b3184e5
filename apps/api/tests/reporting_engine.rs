//! Reporting engine scenarios over the in-memory store

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use office_api::domain::ledger::{
    Expense, ExpenseCategory, Income, IncomeCategory, NewExpense, NewIncome,
};
use office_api::domain::period::DateRange;
use office_api::domain::repositories::{ExpenseRepository, IncomeRepository};
use office_api::infrastructure::repositories::InMemoryStore;
use office_api::reporting::period::{resolve_comparison, resolve_optional};
use office_api::reporting::reports::{CategoryTotal, MonthlyTotal};
use office_api::reporting::{ReportError, ReportingEngine};

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn engine(store: &Arc<InMemoryStore>) -> ReportingEngine {
    ReportingEngine::new(store.clone(), store.clone(), store.clone(), store.clone())
}

async fn add_expense(store: &InMemoryStore, amount: f64, category: ExpenseCategory, date: DateTime<Utc>) {
    let input = NewExpense {
        title: "Expense".to_string(),
        amount,
        category,
        date: Some(date),
        payment_method: None,
        receipt: None,
        notes: None,
        approved_by: None,
        recurring: false,
        recurring_period: None,
    };
    let expense = Expense::new(input, date).expect("valid expense");
    ExpenseRepository::create(store, &expense)
        .await
        .expect("Failed to store expense");
}

async fn add_income(store: &InMemoryStore, amount: f64, client: Option<&str>, date: DateTime<Utc>) {
    let input = NewIncome {
        title: "Income".to_string(),
        amount,
        category: IncomeCategory::Sales,
        date: Some(date),
        client: client.map(str::to_string),
        payment_method: None,
        receipt_number: None,
        notes: None,
        received_by: None,
        recurring: false,
        recurring_period: None,
        taxable: None,
    };
    let income = Income::new(input, date).expect("valid income");
    IncomeRepository::create(store, &income)
        .await
        .expect("Failed to store income");
}

#[tokio::test]
async fn test_rent_category_and_monthly_summaries() {
    let store = Arc::new(InMemoryStore::new());
    add_expense(&store, 100.0, ExpenseCategory::Rent, day(2024, 1, 15)).await;
    add_expense(&store, 50.0, ExpenseCategory::Rent, day(2024, 2, 10)).await;
    add_expense(&store, 999.0, ExpenseCategory::Rent, day(2024, 3, 1)).await;

    let range = resolve_optional(Some("2024-01-01"), Some("2024-02-28"))
        .unwrap()
        .unwrap();
    let engine = engine(&store);

    let categories = engine.expense_categories(Some(range)).await.unwrap();
    assert_eq!(
        categories,
        vec![CategoryTotal {
            category: "Rent".to_string(),
            total_amount: 150.0,
            count: 2,
        }]
    );

    let monthly = engine.expense_monthly(range).await.unwrap();
    assert_eq!(
        monthly,
        vec![
            MonthlyTotal { year: 2024, month: 1, total_amount: 100.0, count: 1 },
            MonthlyTotal { year: 2024, month: 2, total_amount: 50.0, count: 1 },
        ]
    );
}

#[tokio::test]
async fn test_category_totals_equal_raw_sum() {
    let store = Arc::new(InMemoryStore::new());
    let amounts = [
        (12.5, ExpenseCategory::Travel),
        (80.0, ExpenseCategory::Utilities),
        (7.25, ExpenseCategory::Travel),
        (300.0, ExpenseCategory::Salaries),
    ];
    for (i, (amount, category)) in amounts.iter().enumerate() {
        add_expense(&store, *amount, *category, day(2024, 4, 1 + i as u32)).await;
    }

    let summary = engine(&store).expense_categories(None).await.unwrap();
    let summed: f64 = summary.iter().map(|row| row.total_amount).sum();
    let raw: f64 = amounts.iter().map(|(amount, _)| amount).sum();
    assert_eq!(summed, raw);
    assert!(summary.windows(2).all(|w| w[0].total_amount >= w[1].total_amount));
}

#[tokio::test]
async fn test_top_clients_limit_and_blank_exclusion() {
    let store = Arc::new(InMemoryStore::new());
    let entries = [
        (100.0, Some("Acme")),
        (250.0, Some("Globex")),
        (75.0, Some("Initech")),
        (60.0, Some("Umbrella")),
        (5000.0, None),
        (40.0, Some("Acme")),
    ];
    for (i, (amount, client)) in entries.iter().enumerate() {
        add_income(&store, *amount, *client, day(2024, 5, 1 + i as u32)).await;
    }

    let engine = engine(&store);
    let top = engine.top_clients(None, Some(3)).await.unwrap();
    let names: Vec<&str> = top.iter().map(|c| c.client.as_str()).collect();
    assert_eq!(names, vec!["Globex", "Acme", "Initech"]);
    assert_eq!(top[1].last_transaction, day(2024, 5, 6));

    let defaulted = engine.top_clients(None, Some(0)).await.unwrap();
    assert_eq!(defaulted.len(), 4);
}

#[tokio::test]
async fn test_comparative_periods_and_deltas() {
    let store = Arc::new(InMemoryStore::new());
    add_income(&store, 1000.0, Some("Acme"), day(2024, 3, 12)).await;
    add_income(&store, 800.0, Some("Acme"), day(2024, 2, 12)).await;
    add_expense(&store, 400.0, ExpenseCategory::Marketing, day(2024, 3, 2)).await;
    add_expense(&store, 500.0, ExpenseCategory::Marketing, day(2024, 1, 30)).await;

    let periods = resolve_comparison(Some("2024-03-01"), Some("2024-03-31"), Utc::now()).unwrap();
    assert_eq!(periods.previous, DateRange::new(day(2024, 1, 30), day(2024, 2, 29)).unwrap());

    let report = engine(&store).comparative(periods).await.unwrap();
    assert_eq!(report.current_period.profit, 600.0);
    assert_eq!(report.previous_period.profit, 300.0);
    assert_eq!(report.changes.income.value, 200.0);
    assert_eq!(report.changes.income.percentage, 25.0);
    assert_eq!(report.changes.expenses.percentage, -20.0);
    assert_eq!(report.changes.profit.percentage, 100.0);
    assert_eq!(report.expenses_by_category.previous[0].total_amount, 500.0);
}

#[tokio::test]
async fn test_empty_previous_period_reports_full_growth() {
    let store = Arc::new(InMemoryStore::new());
    add_income(&store, 500.0, None, day(2024, 6, 10)).await;

    let periods = resolve_comparison(Some("2024-06-01"), Some("2024-06-30"), Utc::now()).unwrap();
    let report = engine(&store).comparative(periods).await.unwrap();
    assert_eq!(report.changes.income.percentage, 100.0);
    assert_eq!(report.changes.expenses.percentage, 0.0);
    assert!(report.income_by_category.previous.is_empty());
}

#[tokio::test]
async fn test_financial_overview_trend_is_zero_filled() {
    let store = Arc::new(InMemoryStore::new());
    add_income(&store, 1200.0, Some("Acme"), day(2024, 2, 1)).await;
    add_expense(&store, 200.0, ExpenseCategory::Rent, day(2024, 2, 3)).await;
    add_expense(&store, 100.0, ExpenseCategory::Rent, day(2024, 11, 3)).await;

    let range = DateRange::new(day(2024, 1, 1), day(2024, 12, 31)).unwrap();
    let overview = engine(&store).financial_overview(range).await.unwrap();

    assert_eq!(overview.monthly_data.len(), 12);
    assert_eq!(overview.monthly_data[1].profit, 1000.0);
    assert_eq!(overview.monthly_data[10].profit, -100.0);
    assert_eq!(overview.monthly_data[5].income, 0.0);
    assert_eq!(overview.summary.net_profit, 900.0);
    assert_eq!(overview.summary.profit_margin, 75.0);
}

#[tokio::test]
async fn test_dashboard_uses_current_month() {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();
    add_income(&store, 300.0, Some("Acme"), now).await;
    add_expense(&store, 120.0, ExpenseCategory::Utilities, now).await;

    let dashboard = engine(&store).dashboard(now).await.unwrap();
    let month = &dashboard.financial_summary.current_month;
    assert_eq!(month.income, 300.0);
    assert_eq!(month.expenses, 120.0);
    assert_eq!(month.profit, 180.0);
    assert_eq!(dashboard.recent_activity.income.len(), 1);
    assert_eq!(dashboard.counts.employees, 0);
}

#[test]
fn test_malformed_dates_are_validation_errors() {
    let err = resolve_optional(Some("2024-13-45"), Some("2024-12-31")).unwrap_err();
    assert!(matches!(err, ReportError::Validation(_)));

    let err = resolve_comparison(Some("yesterday"), None, Utc::now()).unwrap_err();
    assert!(err.to_string().starts_with("currentStartDate"));
}
