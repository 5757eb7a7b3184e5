// Report shapes handed to the API surface
// Field names are camelCase on the wire; instants serialize as RFC 3339.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::asset::{Asset, AssetCategory, AssetCondition};
use crate::domain::employee::Employee;
use crate::domain::ledger::{Expense, ExpenseCategory, Income, IncomeCategory};

/// One category of a category summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
    pub count: u64,
}

/// One (year, month) bucket of a monthly summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total_amount: f64,
    pub count: u64,
}

/// Zero-filled point of the financial overview's monthly trend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrendPoint {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTotal {
    pub client: String,
    pub total_amount: f64,
    pub count: u64,
    pub last_transaction: DateTime<Utc>,
}

// ===== Dashboard =====

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub counts: DashboardCounts,
    pub financial_summary: DashboardFinancials,
    pub recent_activity: RecentActivity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCounts {
    pub employees: u64,
    pub assets: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFinancials {
    pub current_month: MonthFinancials,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthFinancials {
    pub month: u32,
    pub year: i32,
    pub income: f64,
    pub expenses: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
    pub employees: Vec<RecentEmployee>,
    pub assets: Vec<RecentAsset>,
    pub expenses: Vec<RecentExpense>,
    pub income: Vec<RecentIncome>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEmployee {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

impl From<Employee> for RecentEmployee {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            position: employee.position,
            department: employee.department,
            created_at: employee.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAsset {
    pub id: Uuid,
    pub name: String,
    pub category: AssetCategory,
    pub purchase_date: DateTime<Utc>,
    pub purchase_price: f64,
    pub condition: AssetCondition,
}

impl From<Asset> for RecentAsset {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            name: asset.name,
            category: asset.category,
            purchase_date: asset.purchase_date,
            purchase_price: asset.purchase_price,
            condition: asset.condition,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentExpense {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub date: DateTime<Utc>,
}

impl From<Expense> for RecentExpense {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            title: expense.title,
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentIncome {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: IncomeCategory,
    pub date: DateTime<Utc>,
    pub client: Option<String>,
}

impl From<Income> for RecentIncome {
    fn from(income: Income) -> Self {
        Self {
            id: income.id,
            title: income.title,
            amount: income.amount,
            category: income.category,
            date: income.date,
            client: income.client,
        }
    }
}

// ===== Financial overview =====

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialOverview {
    pub summary: FinancialSummary,
    pub monthly_data: Vec<MonthlyTrendPoint>,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub profit_margin: f64,
}

// ===== Entity analytics =====

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAnalytics {
    pub overview: EmployeeOverview,
    pub department_breakdown: Vec<DepartmentBreakdown>,
    pub position_breakdown: Vec<PositionCount>,
    pub join_date_stats: Vec<YearCount>,
}

/// Salary statistics are omitted entirely when there are no employees
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeOverview {
    pub total_employees: u64,
    pub active_employees: u64,
    pub inactive_employees: u64,
    #[serde(flatten)]
    pub salary: Option<SalaryStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryStats {
    pub average_salary: f64,
    pub min_salary: f64,
    pub max_salary: f64,
    pub total_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBreakdown {
    pub department: String,
    pub count: u64,
    pub average_salary: f64,
    pub total_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionCount {
    pub position: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAnalytics {
    pub overview: AssetOverview,
    pub category_breakdown: Vec<CategoryValue>,
    pub condition_breakdown: Vec<ConditionValue>,
    pub purchase_date_stats: Vec<YearValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOverview {
    pub total_assets: u64,
    pub active_assets: u64,
    pub inactive_assets: u64,
    pub assigned_assets: u64,
    pub unassigned_assets: u64,
    #[serde(flatten)]
    pub value: Option<AssetValueStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetValueStats {
    pub total_value: f64,
    pub average_value: f64,
    pub min_value: f64,
    pub max_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryValue {
    pub category: AssetCategory,
    pub count: u64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionValue {
    pub condition: AssetCondition,
    pub count: u64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearValue {
    pub year: i32,
    pub count: u64,
    pub total_value: f64,
}

// ===== Comparative analytics =====

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeReport {
    pub current_period: PeriodReport,
    pub previous_period: PeriodReport,
    pub changes: Changes,
    pub expenses_by_category: CategoryComparison,
    pub income_by_category: CategoryComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub income: f64,
    pub expenses: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Delta {
    pub value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Changes {
    pub income: Delta,
    pub expenses: Delta,
    pub profit: Delta,
}

/// Parallel category summaries of two periods; the caller diffs them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryComparison {
    pub current: Vec<CategoryTotal>,
    pub previous: Vec<CategoryTotal>,
}
