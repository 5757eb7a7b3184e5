// Comparator
// Absolute and percentage deltas between two periods

use super::reports::{Changes, Delta};

/// Percentage change from `previous` to `current`
///
/// With no positive baseline the change is 100 when there is any positive
/// current value and 0 otherwise. A negative `previous` counts as no
/// baseline, which applies to profit as well.
///
/// # Arguments
/// * `current` - Value of the period being reported
/// * `previous` - Value of the period before it
///
/// # Returns
/// The change in percent, unrounded
///
/// # Example
/// ```
/// use office_api::reporting::comparator::percentage_change;
///
/// assert_eq!(percentage_change(300.0, 200.0), 50.0);
/// assert_eq!(percentage_change(500.0, 0.0), 100.0);
/// assert_eq!(percentage_change(0.0, 0.0), 0.0);
/// ```
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Absolute and percentage change, see [`percentage_change`]
pub fn delta(current: f64, previous: f64) -> Delta {
    Delta {
        value: current - previous,
        percentage: percentage_change(current, previous),
    }
}

/// Income and expense totals of one period
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodTotals {
    pub income: f64,
    pub expenses: f64,
}

impl PeriodTotals {
    pub fn profit(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Changes from `previous` to `current` for income, expenses and profit
///
/// # Example
/// ```
/// use office_api::reporting::comparator::{compare, PeriodTotals};
///
/// let current = PeriodTotals { income: 1000.0, expenses: 400.0 };
/// let previous = PeriodTotals { income: 800.0, expenses: 500.0 };
/// let changes = compare(current, previous);
///
/// assert_eq!(changes.income.value, 200.0);
/// assert_eq!(changes.income.percentage, 25.0);
/// assert_eq!(changes.expenses.percentage, -20.0);
/// assert_eq!(changes.profit.value, 300.0);
/// ```
pub fn compare(current: PeriodTotals, previous: PeriodTotals) -> Changes {
    Changes {
        income: delta(current.income, previous.income),
        expenses: delta(current.expenses, previous.expenses),
        profit: delta(current.profit(), previous.profit()),
    }
}

/// Net profit as a share of income, 0 without income
pub fn profit_margin(totals: PeriodTotals) -> f64 {
    if totals.income > 0.0 {
        totals.profit() / totals.income * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_without_baseline() {
        assert_eq!(percentage_change(500.0, 0.0), 100.0);
        assert_eq!(percentage_change(0.0, 0.0), 0.0);
        assert_eq!(percentage_change(-20.0, 0.0), 0.0);
    }

    #[test]
    fn percentage_with_baseline() {
        assert_eq!(percentage_change(300.0, 200.0), 50.0);
        assert_eq!(percentage_change(100.0, 200.0), -50.0);
    }

    #[test]
    fn negative_previous_profit_counts_as_no_baseline() {
        // previous profit -100, current profit -50
        assert_eq!(percentage_change(-50.0, -100.0), 0.0);
        assert_eq!(percentage_change(50.0, -100.0), 100.0);
    }

    #[test]
    fn compare_income_and_expense_periods() {
        let current = PeriodTotals { income: 1000.0, expenses: 400.0 };
        let previous = PeriodTotals { income: 800.0, expenses: 500.0 };

        let changes = compare(current, previous);
        assert_eq!(changes.income, Delta { value: 200.0, percentage: 25.0 });
        assert_eq!(changes.expenses, Delta { value: -100.0, percentage: -20.0 });
        assert_eq!(changes.profit, Delta { value: 300.0, percentage: 100.0 });
    }

    #[test]
    fn margin() {
        assert_eq!(profit_margin(PeriodTotals { income: 200.0, expenses: 50.0 }), 75.0);
        assert_eq!(profit_margin(PeriodTotals { income: 0.0, expenses: 50.0 }), 0.0);
    }
}
