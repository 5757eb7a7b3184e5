use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{validate_amount, LedgerEntry, PaymentMethod, RecurringPeriod};
use crate::domain::closed_enum::closed_enum;
use crate::domain::employee::{optional_text, required_text};
use crate::domain::period::{deserialize_nullable, deserialize_optional_instant};

closed_enum! {
    ExpenseCategory, "expense category" {
        Rent => "Rent",
        Utilities => "Utilities",
        Salaries => "Salaries",
        OfficeSupplies => "Office Supplies",
        Equipment => "Equipment",
        Marketing => "Marketing",
        Travel => "Travel",
        Maintenance => "Maintenance",
        Insurance => "Insurance",
        Taxes => "Taxes",
        Miscellaneous => "Miscellaneous",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub receipt: Option<String>,
    pub notes: Option<String>,
    pub approved_by: Option<Uuid>,
    pub recurring: bool,
    pub recurring_period: RecurringPeriod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub approved_by: Option<Uuid>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub recurring_period: Option<RecurringPeriod>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseChanges {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<ExpenseCategory>,
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub date: Option<DateTime<Utc>>,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub receipt: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub approved_by: Option<Option<Uuid>>,
    pub recurring: Option<bool>,
    pub recurring_period: Option<RecurringPeriod>,
}

impl Expense {
    /// Records an expense; `date` defaults to `now` and payment to cash
    pub fn new(input: NewExpense, now: DateTime<Utc>) -> Result<Self, String> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: required_text("title", input.title)?,
            amount: validate_amount(input.amount)?,
            category: input.category,
            date: input.date.unwrap_or(now),
            payment_method: input.payment_method.unwrap_or(PaymentMethod::Cash),
            receipt: optional_text(input.receipt),
            notes: optional_text(input.notes),
            approved_by: input.approved_by,
            recurring: input.recurring,
            recurring_period: input.recurring_period.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, changes: ExpenseChanges, now: DateTime<Utc>) -> Result<(), String> {
        let mut next = self.clone();

        if let Some(title) = changes.title {
            next.title = required_text("title", title)?;
        }
        if let Some(amount) = changes.amount {
            next.amount = validate_amount(amount)?;
        }
        if let Some(category) = changes.category {
            next.category = category;
        }
        if let Some(date) = changes.date {
            next.date = date;
        }
        if let Some(method) = changes.payment_method {
            next.payment_method = method;
        }
        if let Some(receipt) = changes.receipt {
            next.receipt = optional_text(receipt);
        }
        if let Some(notes) = changes.notes {
            next.notes = optional_text(notes);
        }
        if let Some(approved_by) = changes.approved_by {
            next.approved_by = approved_by;
        }
        if let Some(recurring) = changes.recurring {
            next.recurring = recurring;
        }
        if let Some(period) = changes.recurring_period {
            next.recurring_period = period;
        }

        next.updated_at = now;
        *self = next;
        Ok(())
    }
}

impl LedgerEntry for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn category_label(&self) -> &'static str {
        self.category.as_str()
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}
