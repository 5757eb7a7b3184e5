// Aggregator
// Single-pass grouping of store records into report rows

use chrono::Datelike;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::reports::{
    AssetAnalytics, AssetOverview, AssetValueStats, CategoryTotal, CategoryValue, ClientTotal,
    ConditionValue, DepartmentBreakdown, EmployeeAnalytics, EmployeeOverview, MonthlyTotal,
    MonthlyTrendPoint, PositionCount, SalaryStats, YearCount, YearValue,
};
use crate::domain::asset::{Asset, AssetCategory, AssetCondition};
use crate::domain::employee::Employee;
use crate::domain::ledger::{Income, LedgerEntry};

/// Number of positions kept in the employee position breakdown
pub const TOP_POSITIONS: usize = 10;

/// Running count/sum/min/max over one numeric field
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    fn collect(values: impl IntoIterator<Item = f64>) -> Self {
        let mut acc = Self::default();
        values.into_iter().for_each(|v| acc.push(v));
        acc
    }
}

/// Groups that remember first-seen key order
///
/// Sorting the output with a stable sort then breaks ties by first
/// appearance in the input.
struct Grouped<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K: Eq + Hash + Clone, V: Default> Grouped<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: K) -> &mut V {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.index.insert(key.clone(), position);
                self.entries.push((key, V::default()));
                position
            }
        };
        &mut self.entries[position].1
    }

    fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

/// Sort key helper: descending by `f64`, stable for ties
fn by_amount_desc<K>(entries: &mut [(K, Accumulator)]) {
    entries.sort_by(|a, b| b.1.sum.total_cmp(&a.1.sum));
}

fn by_count_desc<K>(entries: &mut [(K, Accumulator)]) {
    entries.sort_by(|a, b| b.1.count.cmp(&a.1.count));
}

/// Sum of all amounts
pub fn total<T: LedgerEntry>(entries: &[T]) -> f64 {
    entries.iter().map(LedgerEntry::amount).sum()
}

/// Groups by category, descending by summed amount
///
/// # Example
/// ```
/// use chrono::Utc;
/// use office_api::domain::ledger::{Expense, NewExpense};
/// use office_api::reporting::aggregator::category_summary;
///
/// let rent: NewExpense = serde_json::from_str(
///     r#"{"title": "Rent", "amount": 100, "category": "Rent"}"#,
/// ).unwrap();
/// let expenses = vec![Expense::new(rent, Utc::now()).unwrap()];
///
/// let summary = category_summary(&expenses);
/// assert_eq!(summary[0].category, "Rent");
/// assert_eq!(summary[0].total_amount, 100.0);
/// ```
pub fn category_summary<T: LedgerEntry>(entries: &[T]) -> Vec<CategoryTotal> {
    let mut groups: Grouped<&'static str, Accumulator> = Grouped::new();
    for entry in entries {
        groups.entry(entry.category_label()).push(entry.amount());
    }

    let mut rows = groups.into_entries();
    by_amount_desc(&mut rows);
    rows.into_iter()
        .map(|(category, acc)| CategoryTotal {
            category: category.to_string(),
            total_amount: acc.sum,
            count: acc.count,
        })
        .collect()
}

/// Groups by (year, month) of the entry date, ascending; empty months are absent
pub fn monthly_summary<T: LedgerEntry>(entries: &[T]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<(i32, u32), Accumulator> = BTreeMap::new();
    for entry in entries {
        let date = entry.date();
        months
            .entry((date.year(), date.month()))
            .or_default()
            .push(entry.amount());
    }

    months
        .into_iter()
        .map(|((year, month), acc)| MonthlyTotal {
            year,
            month,
            total_amount: acc.sum,
            count: acc.count,
        })
        .collect()
}

/// One point per month in `months`, zero where a summary has no bucket
///
/// # Arguments
/// * `months` - Every (year, month) the report covers, ascending
/// * `income` - Monthly income summary over the same range
/// * `expenses` - Monthly expense summary over the same range
///
/// # Returns
/// Exactly one point per entry of `months`, in the same order
pub fn monthly_trend(
    months: &[(i32, u32)],
    income: &[MonthlyTotal],
    expenses: &[MonthlyTotal],
) -> Vec<MonthlyTrendPoint> {
    let lookup = |rows: &[MonthlyTotal], year: i32, month: u32| {
        rows.iter()
            .find(|row| row.year == year && row.month == month)
            .map_or(0.0, |row| row.total_amount)
    };

    months
        .iter()
        .map(|&(year, month)| {
            let income = lookup(income, year, month);
            let expenses = lookup(expenses, year, month);
            MonthlyTrendPoint {
                year,
                month,
                income,
                expenses,
                profit: income - expenses,
            }
        })
        .collect()
}

/// Clients ranked by summed income
///
/// Entries whose client is absent or whitespace-only are skipped. Ties keep
/// first-seen order and each row carries the client's latest entry date.
///
/// # Arguments
/// * `entries` - Income entries already filtered to the report range
/// * `limit` - Maximum number of clients returned
pub fn top_clients(entries: &[Income], limit: usize) -> Vec<ClientTotal> {
    #[derive(Default)]
    struct ClientAcc {
        amounts: Accumulator,
        last: Option<chrono::DateTime<chrono::Utc>>,
    }

    let mut groups: Grouped<&str, ClientAcc> = Grouped::new();
    for entry in entries {
        let Some(client) = entry.client.as_deref().filter(|c| !c.trim().is_empty()) else {
            continue;
        };
        let acc = groups.entry(client);
        acc.amounts.push(entry.amount);
        acc.last = acc.last.max(Some(entry.date));
    }

    let mut rows = groups.into_entries();
    rows.sort_by(|a, b| b.1.amounts.sum.total_cmp(&a.1.amounts.sum));
    rows.into_iter()
        .take(limit)
        .filter_map(|(client, acc)| {
            acc.last.map(|last_transaction| ClientTotal {
                client: client.to_string(),
                total_amount: acc.amounts.sum,
                count: acc.amounts.count,
                last_transaction,
            })
        })
        .collect()
}

/// Global employee snapshot; dates are ignored except for join-year buckets
pub fn employee_statistics(employees: &[Employee]) -> EmployeeAnalytics {
    let salaries = Accumulator::collect(employees.iter().map(|e| e.salary));
    let active = employees.iter().filter(|e| e.is_active).count() as u64;

    let mut departments: Grouped<&str, Accumulator> = Grouped::new();
    let mut positions: Grouped<&str, Accumulator> = Grouped::new();
    let mut join_years: BTreeMap<i32, u64> = BTreeMap::new();
    for employee in employees {
        departments
            .entry(employee.department.as_str())
            .push(employee.salary);
        positions.entry(employee.position.as_str()).push(0.0);
        *join_years.entry(employee.join_date.year()).or_default() += 1;
    }

    let mut departments = departments.into_entries();
    by_count_desc(&mut departments);
    let mut positions = positions.into_entries();
    by_count_desc(&mut positions);

    EmployeeAnalytics {
        overview: EmployeeOverview {
            total_employees: employees.len() as u64,
            active_employees: active,
            inactive_employees: employees.len() as u64 - active,
            salary: (salaries.count > 0).then(|| SalaryStats {
                average_salary: salaries.average(),
                min_salary: salaries.min,
                max_salary: salaries.max,
                total_salary: salaries.sum,
            }),
        },
        department_breakdown: departments
            .into_iter()
            .map(|(department, acc)| DepartmentBreakdown {
                department: department.to_string(),
                count: acc.count,
                average_salary: acc.average(),
                total_salary: acc.sum,
            })
            .collect(),
        position_breakdown: positions
            .into_iter()
            .take(TOP_POSITIONS)
            .map(|(position, acc)| PositionCount {
                position: position.to_string(),
                count: acc.count,
            })
            .collect(),
        join_date_stats: join_years
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect(),
    }
}

/// Global asset snapshot over purchase prices
pub fn asset_statistics(assets: &[Asset]) -> AssetAnalytics {
    let values = Accumulator::collect(assets.iter().map(|a| a.purchase_price));
    let total = assets.len() as u64;
    let active = assets.iter().filter(|a| a.is_active).count() as u64;
    let assigned = assets.iter().filter(|a| a.is_assigned()).count() as u64;

    let mut categories: Grouped<AssetCategory, Accumulator> = Grouped::new();
    let mut conditions: Grouped<AssetCondition, Accumulator> = Grouped::new();
    let mut years: BTreeMap<i32, Accumulator> = BTreeMap::new();
    for asset in assets {
        categories.entry(asset.category).push(asset.purchase_price);
        conditions.entry(asset.condition).push(asset.purchase_price);
        years
            .entry(asset.purchase_date.year())
            .or_default()
            .push(asset.purchase_price);
    }

    let mut categories = categories.into_entries();
    by_count_desc(&mut categories);
    let mut conditions = conditions.into_entries();
    by_count_desc(&mut conditions);

    AssetAnalytics {
        overview: AssetOverview {
            total_assets: total,
            active_assets: active,
            inactive_assets: total - active,
            assigned_assets: assigned,
            unassigned_assets: total - assigned,
            value: (values.count > 0).then(|| AssetValueStats {
                total_value: values.sum,
                average_value: values.average(),
                min_value: values.min,
                max_value: values.max,
            }),
        },
        category_breakdown: categories
            .into_iter()
            .map(|(category, acc)| CategoryValue {
                category,
                count: acc.count,
                total_value: acc.sum,
            })
            .collect(),
        condition_breakdown: conditions
            .into_iter()
            .map(|(condition, acc)| ConditionValue {
                condition,
                count: acc.count,
                total_value: acc.sum,
            })
            .collect(),
        purchase_date_stats: years
            .into_iter()
            .map(|(year, acc)| YearValue {
                year,
                count: acc.count,
                total_value: acc.sum,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::NewAsset;
    use crate::domain::employee::NewEmployee;
    use crate::domain::ledger::{Expense, ExpenseCategory, IncomeCategory, NewExpense, NewIncome};
    use crate::domain::user::Email;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn expense(amount: f64, category: ExpenseCategory, date: DateTime<Utc>) -> Expense {
        let input = NewExpense {
            title: format!("{category} bill"),
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
        Expense::new(input, date).unwrap()
    }

    fn income(amount: f64, client: Option<&str>, date: DateTime<Utc>) -> Income {
        let input = NewIncome {
            title: "Invoice".to_string(),
            amount,
            category: IncomeCategory::Services,
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
        Income::new(input, date).unwrap()
    }

    fn employee(department: &str, position: &str, salary: f64, active: bool) -> Employee {
        let input = NewEmployee {
            name: "Someone".to_string(),
            position: position.to_string(),
            department: department.to_string(),
            email: Email::new(format!("{}@office.com", Uuid::new_v4().simple())).unwrap(),
            phone: None,
            salary,
            join_date: Some(day(2022, 3, 1)),
            is_active: Some(active),
        };
        Employee::new(input, Utc::now()).unwrap()
    }

    fn asset(price: f64, category: AssetCategory, assigned: bool) -> Asset {
        let input = NewAsset {
            name: "Thing".to_string(),
            category,
            serial_number: None,
            purchase_date: day(2023, 7, 1),
            purchase_price: price,
            condition: None,
            assigned_to: assigned.then(Uuid::new_v4),
            location: None,
            notes: None,
            is_active: None,
        };
        Asset::new(input, Utc::now()).unwrap()
    }

    #[test]
    fn category_summary_matches_rent_scenario() {
        let expenses = vec![
            expense(100.0, ExpenseCategory::Rent, day(2024, 1, 15)),
            expense(50.0, ExpenseCategory::Rent, day(2024, 2, 10)),
        ];

        assert_eq!(
            category_summary(&expenses),
            vec![CategoryTotal {
                category: "Rent".to_string(),
                total_amount: 150.0,
                count: 2,
            }]
        );
        assert_eq!(
            monthly_summary(&expenses),
            vec![
                MonthlyTotal { year: 2024, month: 1, total_amount: 100.0, count: 1 },
                MonthlyTotal { year: 2024, month: 2, total_amount: 50.0, count: 1 },
            ]
        );
    }

    #[test]
    fn category_summary_conserves_total_and_sorts() {
        let expenses = vec![
            expense(20.0, ExpenseCategory::Travel, day(2024, 1, 1)),
            expense(75.5, ExpenseCategory::Marketing, day(2024, 1, 2)),
            expense(30.0, ExpenseCategory::Travel, day(2024, 1, 3)),
            expense(12.25, ExpenseCategory::Taxes, day(2024, 1, 4)),
        ];

        let summary = category_summary(&expenses);
        let summed: f64 = summary.iter().map(|row| row.total_amount).sum();
        assert_eq!(summed, total(&expenses));

        let order: Vec<&str> = summary.iter().map(|row| row.category.as_str()).collect();
        assert_eq!(order, vec!["Marketing", "Travel", "Taxes"]);
    }

    #[test]
    fn category_ties_keep_first_seen_order() {
        let expenses = vec![
            expense(40.0, ExpenseCategory::Utilities, day(2024, 1, 1)),
            expense(40.0, ExpenseCategory::Insurance, day(2024, 1, 2)),
            expense(40.0, ExpenseCategory::Equipment, day(2024, 1, 3)),
        ];

        let order: Vec<String> = category_summary(&expenses)
            .into_iter()
            .map(|row| row.category)
            .collect();
        assert_eq!(order, vec!["Utilities", "Insurance", "Equipment"]);
    }

    #[test]
    fn monthly_summary_orders_across_years() {
        let expenses = vec![
            expense(5.0, ExpenseCategory::Rent, day(2025, 1, 3)),
            expense(7.0, ExpenseCategory::Rent, day(2024, 12, 30)),
        ];
        let months: Vec<(i32, u32)> = monthly_summary(&expenses)
            .into_iter()
            .map(|row| (row.year, row.month))
            .collect();
        assert_eq!(months, vec![(2024, 12), (2025, 1)]);
    }

    #[test]
    fn monthly_trend_zero_fills() {
        let months: Vec<(i32, u32)> = (1..=12).map(|m| (2024, m)).collect();
        let income = vec![MonthlyTotal { year: 2024, month: 3, total_amount: 500.0, count: 2 }];
        let expenses = vec![MonthlyTotal { year: 2024, month: 3, total_amount: 200.0, count: 1 }];

        let trend = monthly_trend(&months, &income, &expenses);
        assert_eq!(trend.len(), 12);
        assert_eq!(trend[0].income, 0.0);
        assert_eq!(trend[2].profit, 300.0);
        assert!(trend.windows(2).all(|w| (w[0].year, w[0].month) < (w[1].year, w[1].month)));
    }

    #[test]
    fn top_clients_limits_sorts_and_skips_blank() {
        let entries = vec![
            income(100.0, Some("Acme"), day(2024, 1, 1)),
            income(300.0, Some("Globex"), day(2024, 1, 5)),
            income(999.0, None, day(2024, 1, 6)),
            income(250.0, Some("Acme"), day(2024, 2, 1)),
            income(50.0, Some("Initech"), day(2024, 2, 2)),
            income(10.0, Some("Umbrella"), day(2024, 2, 3)),
        ];

        let top = top_clients(&entries, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].client, "Acme");
        assert_eq!(top[0].total_amount, 350.0);
        assert_eq!(top[0].count, 2);
        assert_eq!(top[0].last_transaction, day(2024, 2, 1));
        assert_eq!(top[1].client, "Globex");
        assert!(top.windows(2).all(|w| w[0].total_amount >= w[1].total_amount));
    }

    #[test]
    fn top_clients_whitespace_client_is_blank() {
        let mut entry = income(80.0, Some("Acme"), day(2024, 1, 1));
        entry.client = Some("   ".to_string());
        assert!(top_clients(&[entry], 10).is_empty());
    }

    #[test]
    fn asset_value_statistics() {
        let assets = vec![
            asset(100.0, AssetCategory::Furniture, true),
            asset(200.0, AssetCategory::Electronics, false),
            asset(300.0, AssetCategory::Electronics, false),
        ];

        let stats = asset_statistics(&assets);
        assert_eq!(
            stats.overview.value,
            Some(AssetValueStats {
                total_value: 600.0,
                average_value: 200.0,
                min_value: 100.0,
                max_value: 300.0,
            })
        );
        assert_eq!(stats.overview.assigned_assets, 1);
        assert_eq!(stats.overview.unassigned_assets, 2);
        assert_eq!(stats.category_breakdown[0].category, AssetCategory::Electronics);
        assert_eq!(stats.category_breakdown[0].total_value, 500.0);
        assert_eq!(stats.condition_breakdown[0].condition, AssetCondition::Good);
        assert_eq!(stats.purchase_date_stats[0].year, 2023);
    }

    #[test]
    fn empty_assets_have_no_value_stats() {
        let stats = asset_statistics(&[]);
        assert_eq!(stats.overview.total_assets, 0);
        assert!(stats.overview.value.is_none());

        let json = serde_json::to_value(&stats.overview).unwrap();
        assert!(json.get("averageValue").is_none());
    }

    #[test]
    fn employee_breakdowns() {
        let employees = vec![
            employee("Sales", "Rep", 3000.0, true),
            employee("Engineering", "Developer", 6000.0, true),
            employee("Engineering", "Developer", 5000.0, false),
            employee("Sales", "Manager", 4000.0, true),
            employee("Engineering", "Lead", 7000.0, true),
        ];

        let stats = employee_statistics(&employees);
        assert_eq!(stats.overview.total_employees, 5);
        assert_eq!(stats.overview.inactive_employees, 1);

        let salary = stats.overview.salary.clone().unwrap();
        assert_eq!(salary.total_salary, 25000.0);
        assert_eq!(salary.average_salary, 5000.0);
        assert_eq!(salary.min_salary, 3000.0);
        assert_eq!(salary.max_salary, 7000.0);

        assert_eq!(stats.department_breakdown[0].department, "Engineering");
        assert_eq!(stats.department_breakdown[0].count, 3);
        assert_eq!(stats.department_breakdown[0].average_salary, 6000.0);
        assert_eq!(stats.position_breakdown[0].position, "Developer");
        assert_eq!(stats.join_date_stats, vec![YearCount { year: 2022, count: 5 }]);

        let json = serde_json::to_value(&stats.overview).unwrap();
        assert_eq!(json["averageSalary"], 5000.0);
    }

    #[test]
    fn positions_truncated_to_top_ten() {
        let employees: Vec<Employee> = (0..15)
            .map(|i| employee("Ops", &format!("Role {i}"), 1000.0, true))
            .collect();
        assert_eq!(employee_statistics(&employees).position_breakdown.len(), TOP_POSITIONS);
    }
}
