// Reporting engine
// Fetches records through the store ports and feeds the aggregator and
// comparator. Independent queries of one report run concurrently and every
// one of them must succeed.

use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;

use super::aggregator;
use super::comparator::{self, PeriodTotals};
use super::error::ReportResult;
use super::period::{self, ComparisonPeriods};
use super::reports::{
    AssetAnalytics, CategoryComparison, CategoryTotal, ClientTotal, ComparativeReport,
    DashboardCounts, DashboardFinancials, DashboardSummary, EmployeeAnalytics, FinancialOverview,
    FinancialSummary, MonthFinancials, MonthlyTotal, PeriodReport, RecentActivity,
};
use crate::domain::ledger::{Expense, Income};
use crate::domain::period::DateRange;
use crate::domain::repositories::{
    AssetFilter, AssetRepository, EmployeeFilter, EmployeeRepository, ExpenseFilter,
    ExpenseRepository, IncomeFilter, IncomeRepository,
};

/// Records listed per entity in the dashboard's recent activity
pub const RECENT_LIMIT: usize = 5;

/// Client ranking size when the caller gives none
pub const DEFAULT_CLIENT_LIMIT: usize = 10;

/// Builds every analytics report from the record store ports
///
/// The engine holds no state of its own. Each report fetches what it
/// needs, running independent queries concurrently, and fails as a whole
/// when any fetch fails.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use chrono::Utc;
/// use office_api::infrastructure::repositories::InMemoryStore;
/// use office_api::reporting::ReportingEngine;
///
/// let store = Arc::new(InMemoryStore::new());
/// let engine = ReportingEngine::new(store.clone(), store.clone(), store.clone(), store);
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let summary = runtime.block_on(engine.dashboard(Utc::now())).unwrap();
/// assert_eq!(summary.counts.employees, 0);
/// ```
#[derive(Clone)]
pub struct ReportingEngine {
    employees: Arc<dyn EmployeeRepository>,
    assets: Arc<dyn AssetRepository>,
    expenses: Arc<dyn ExpenseRepository>,
    income: Arc<dyn IncomeRepository>,
}

impl ReportingEngine {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        assets: Arc<dyn AssetRepository>,
        expenses: Arc<dyn ExpenseRepository>,
        income: Arc<dyn IncomeRepository>,
    ) -> Self {
        Self {
            employees,
            assets,
            expenses,
            income,
        }
    }

    /// Active counts, current-month totals and the newest records
    pub async fn dashboard(&self, now: DateTime<Utc>) -> ReportResult<DashboardSummary> {
        let month = period::current_month(now)?;
        tracing::debug!(start = %month.start(), end = %month.end(), "building dashboard");

        let active_employees = EmployeeFilter {
            is_active: Some(true),
            ..EmployeeFilter::default()
        };
        let active_assets = AssetFilter {
            is_active: Some(true),
            ..AssetFilter::default()
        };

        let income_filter = IncomeFilter::in_range(month);
        let expense_filter = ExpenseFilter::in_range(month);

        let (employees, assets, income, expenses) = tokio::try_join!(
            self.employees.count(&active_employees),
            self.assets.count(&active_assets),
            self.income.find(&income_filter),
            self.expenses.find(&expense_filter),
        )?;
        let (recent_employees, recent_assets, recent_expenses, recent_income) = tokio::try_join!(
            self.employees.recent(RECENT_LIMIT),
            self.assets.recent(RECENT_LIMIT),
            self.expenses.recent(RECENT_LIMIT),
            self.income.recent(RECENT_LIMIT),
        )?;

        let totals = totals_of(&income, &expenses);
        Ok(DashboardSummary {
            counts: DashboardCounts { employees, assets },
            financial_summary: DashboardFinancials {
                current_month: MonthFinancials {
                    month: now.month(),
                    year: now.year(),
                    income: totals.income,
                    expenses: totals.expenses,
                    profit: totals.profit(),
                },
            },
            recent_activity: RecentActivity {
                employees: recent_employees.into_iter().map(Into::into).collect(),
                assets: recent_assets.into_iter().map(Into::into).collect(),
                expenses: recent_expenses.into_iter().map(Into::into).collect(),
                income: recent_income.into_iter().map(Into::into).collect(),
            },
        })
    }

    /// Totals, zero-filled monthly trend and category splits for `range`
    ///
    /// # Returns
    /// * `Ok(FinancialOverview)` - One trend point per calendar month `range` touches
    /// * `Err(ReportError::Store)` - If any ledger query fails
    pub async fn financial_overview(&self, range: DateRange) -> ReportResult<FinancialOverview> {
        tracing::debug!(start = %range.start(), end = %range.end(), "building financial overview");

        let income_filter = IncomeFilter::in_range(range);
        let expense_filter = ExpenseFilter::in_range(range);
        let (income, expenses) = tokio::try_join!(
            self.income.find(&income_filter),
            self.expenses.find(&expense_filter),
        )?;

        let totals = totals_of(&income, &expenses);
        let monthly_data = aggregator::monthly_trend(
            &period::months_in(range),
            &aggregator::monthly_summary(&income),
            &aggregator::monthly_summary(&expenses),
        );

        Ok(FinancialOverview {
            summary: FinancialSummary {
                start_date: range.start(),
                end_date: range.end(),
                total_income: totals.income,
                total_expenses: totals.expenses,
                net_profit: totals.profit(),
                profit_margin: comparator::profit_margin(totals),
            },
            monthly_data,
            expenses_by_category: aggregator::category_summary(&expenses),
            income_by_category: aggregator::category_summary(&income),
        })
    }

    pub async fn employee_analytics(&self) -> ReportResult<EmployeeAnalytics> {
        let employees = self.employees.find(&EmployeeFilter::default()).await?;
        tracing::debug!(records = employees.len(), "building employee analytics");
        Ok(aggregator::employee_statistics(&employees))
    }

    pub async fn asset_analytics(&self) -> ReportResult<AssetAnalytics> {
        let assets = self.assets.find(&AssetFilter::default()).await?;
        tracing::debug!(records = assets.len(), "building asset analytics");
        Ok(aggregator::asset_statistics(&assets))
    }

    /// Current period against the equally long period before it
    pub async fn comparative(&self, periods: ComparisonPeriods) -> ReportResult<ComparativeReport> {
        let ComparisonPeriods { current, previous } = periods;
        tracing::debug!(
            current_start = %current.start(),
            current_end = %current.end(),
            previous_start = %previous.start(),
            previous_end = %previous.end(),
            "building comparative report"
        );

        let current_income_filter = IncomeFilter::in_range(current);
        let current_expense_filter = ExpenseFilter::in_range(current);
        let previous_income_filter = IncomeFilter::in_range(previous);
        let previous_expense_filter = ExpenseFilter::in_range(previous);
        let (current_income, current_expenses, previous_income, previous_expenses) =
            tokio::try_join!(
                self.income.find(&current_income_filter),
                self.expenses.find(&current_expense_filter),
                self.income.find(&previous_income_filter),
                self.expenses.find(&previous_expense_filter),
            )?;

        let current_totals = totals_of(&current_income, &current_expenses);
        let previous_totals = totals_of(&previous_income, &previous_expenses);

        Ok(ComparativeReport {
            current_period: period_report(current, current_totals),
            previous_period: period_report(previous, previous_totals),
            changes: comparator::compare(current_totals, previous_totals),
            expenses_by_category: CategoryComparison {
                current: aggregator::category_summary(&current_expenses),
                previous: aggregator::category_summary(&previous_expenses),
            },
            income_by_category: CategoryComparison {
                current: aggregator::category_summary(&current_income),
                previous: aggregator::category_summary(&previous_income),
            },
        })
    }

    pub async fn expense_categories(&self, range: Option<DateRange>) -> ReportResult<Vec<CategoryTotal>> {
        let filter = ExpenseFilter {
            range,
            ..ExpenseFilter::default()
        };
        let expenses = self.expenses.find(&filter).await?;
        Ok(aggregator::category_summary(&expenses))
    }

    pub async fn expense_monthly(&self, range: DateRange) -> ReportResult<Vec<MonthlyTotal>> {
        let expenses = self.expenses.find(&ExpenseFilter::in_range(range)).await?;
        Ok(aggregator::monthly_summary(&expenses))
    }

    pub async fn income_categories(&self, range: Option<DateRange>) -> ReportResult<Vec<CategoryTotal>> {
        let filter = IncomeFilter {
            range,
            ..IncomeFilter::default()
        };
        let income = self.income.find(&filter).await?;
        Ok(aggregator::category_summary(&income))
    }

    pub async fn income_monthly(&self, range: DateRange) -> ReportResult<Vec<MonthlyTotal>> {
        let income = self.income.find(&IncomeFilter::in_range(range)).await?;
        Ok(aggregator::monthly_summary(&income))
    }

    /// Ranked clients; a missing or zero limit falls back to the default
    pub async fn top_clients(
        &self,
        range: Option<DateRange>,
        limit: Option<usize>,
    ) -> ReportResult<Vec<ClientTotal>> {
        let limit = limit.filter(|&n| n > 0).unwrap_or(DEFAULT_CLIENT_LIMIT);
        let filter = IncomeFilter {
            range,
            ..IncomeFilter::default()
        };
        let income = self.income.find(&filter).await?;
        Ok(aggregator::top_clients(&income, limit))
    }
}

fn totals_of(income: &[Income], expenses: &[Expense]) -> PeriodTotals {
    PeriodTotals {
        income: aggregator::total(income),
        expenses: aggregator::total(expenses),
    }
}

fn period_report(range: DateRange, totals: PeriodTotals) -> PeriodReport {
    PeriodReport {
        start_date: range.start(),
        end_date: range.end(),
        income: totals.income,
        expenses: totals.expenses,
        profit: totals.profit(),
    }
}
