use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{validate_amount, LedgerEntry, PaymentMethod, RecurringPeriod};
use crate::domain::closed_enum::closed_enum;
use crate::domain::employee::{optional_text, required_text};
use crate::domain::period::{deserialize_nullable, deserialize_optional_instant};

closed_enum! {
    IncomeCategory, "income category" {
        Sales => "Sales",
        Services => "Services",
        Investments => "Investments",
        Rental => "Rental",
        Refunds => "Refunds",
        Grants => "Grants",
        Royalties => "Royalties",
        Other => "Other",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub category: IncomeCategory,
    pub date: DateTime<Utc>,
    pub client: Option<String>,
    pub payment_method: PaymentMethod,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
    pub received_by: Option<Uuid>,
    pub recurring: bool,
    pub recurring_period: RecurringPeriod,
    pub taxable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    pub title: String,
    pub amount: f64,
    pub category: IncomeCategory,
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub received_by: Option<Uuid>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub recurring_period: Option<RecurringPeriod>,
    #[serde(default)]
    pub taxable: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeChanges {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<IncomeCategory>,
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub client: Option<Option<String>>,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub receipt_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub received_by: Option<Option<Uuid>>,
    pub recurring: Option<bool>,
    pub recurring_period: Option<RecurringPeriod>,
    pub taxable: Option<bool>,
}

impl Income {
    /// Records income; `date` defaults to `now`, payment to bank transfer,
    /// `taxable` to true. A blank client is stored as absent.
    pub fn new(input: NewIncome, now: DateTime<Utc>) -> Result<Self, String> {
        Ok(Self {
            id: Uuid::new_v4(),
            title: required_text("title", input.title)?,
            amount: validate_amount(input.amount)?,
            category: input.category,
            date: input.date.unwrap_or(now),
            client: optional_text(input.client),
            payment_method: input.payment_method.unwrap_or(PaymentMethod::BankTransfer),
            receipt_number: optional_text(input.receipt_number),
            notes: optional_text(input.notes),
            received_by: input.received_by,
            recurring: input.recurring,
            recurring_period: input.recurring_period.unwrap_or_default(),
            taxable: input.taxable.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, changes: IncomeChanges, now: DateTime<Utc>) -> Result<(), String> {
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
        if let Some(client) = changes.client {
            next.client = optional_text(client);
        }
        if let Some(method) = changes.payment_method {
            next.payment_method = method;
        }
        if let Some(receipt_number) = changes.receipt_number {
            next.receipt_number = optional_text(receipt_number);
        }
        if let Some(notes) = changes.notes {
            next.notes = optional_text(notes);
        }
        if let Some(received_by) = changes.received_by {
            next.received_by = received_by;
        }
        if let Some(recurring) = changes.recurring {
            next.recurring = recurring;
        }
        if let Some(period) = changes.recurring_period {
            next.recurring_period = period;
        }
        if let Some(taxable) = changes.taxable {
            next.taxable = taxable;
        }

        next.updated_at = now;
        *self = next;
        Ok(())
    }
}

impl LedgerEntry for Income {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_eight_categories() {
        assert_eq!(IncomeCategory::ALL.len(), 8);
    }

    #[test]
    fn defaults_applied() {
        let input: NewIncome = serde_json::from_str(
            r#"{"title": "Consulting", "amount": 900, "category": "Services", "client": "  "}"#,
        )
        .unwrap();
        let income = Income::new(input, Utc::now()).unwrap();

        assert_eq!(income.payment_method, PaymentMethod::BankTransfer);
        assert!(income.taxable);
        assert!(income.client.is_none());
    }

    #[test]
    fn update_validates_amount() {
        let input: NewIncome = serde_json::from_str(
            r#"{"title": "Royalty", "amount": 50, "category": "Royalties"}"#,
        )
        .unwrap();
        let mut income = Income::new(input, Utc::now()).unwrap();

        let changes = IncomeChanges {
            amount: Some(-1.0),
            ..Default::default()
        };
        assert!(income.apply(changes, Utc::now()).is_err());
        assert_eq!(income.amount, 50.0);
    }
}
