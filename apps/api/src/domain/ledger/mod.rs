// Ledger domain module
// Expenses and income share payment/recurrence vocabulary and the
// `LedgerEntry` view the reporting engine aggregates over.

pub mod expense;
pub mod income;

use chrono::{DateTime, Utc};

use super::closed_enum::closed_enum;

pub use expense::{Expense, ExpenseCategory, ExpenseChanges, NewExpense};
pub use income::{Income, IncomeCategory, IncomeChanges, NewIncome};

closed_enum! {
    PaymentMethod, "payment method" {
        Cash => "Cash",
        CreditCard => "Credit Card",
        BankTransfer => "Bank Transfer",
        Check => "Check",
        OnlinePayment => "Online Payment",
    }
}

closed_enum! {
    RecurringPeriod, "recurring period" {
        Daily => "Daily",
        Weekly => "Weekly",
        Monthly => "Monthly",
        Quarterly => "Quarterly",
        Yearly => "Yearly",
        None => "None",
    }
}

impl Default for RecurringPeriod {
    fn default() -> Self {
        RecurringPeriod::None
    }
}

/// Read-only view of a dated, categorised amount
pub trait LedgerEntry {
    fn amount(&self) -> f64;
    fn category_label(&self) -> &'static str;
    fn date(&self) -> DateTime<Utc>;
}

pub(crate) fn validate_amount(amount: f64) -> Result<f64, String> {
    if !amount.is_finite() || amount < 0.0 {
        return Err("Amount cannot be negative".to_string());
    }
    Ok(amount)
}
