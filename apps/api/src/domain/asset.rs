use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::closed_enum::closed_enum;
use super::employee::{optional_text, required_text};
use super::period::{deserialize_instant, deserialize_nullable, deserialize_optional_instant};

closed_enum! {
    /// Asset classification
    AssetCategory, "asset category" {
        Electronics => "Electronics",
        Furniture => "Furniture",
        Vehicle => "Vehicle",
        OfficeEquipment => "Office Equipment",
        Software => "Software",
        Other => "Other",
    }
}

closed_enum! {
    /// Physical condition of an asset
    AssetCondition, "asset condition" {
        Excellent => "Excellent",
        Good => "Good",
        Fair => "Fair",
        Poor => "Poor",
    }
}

impl Default for AssetCondition {
    fn default() -> Self {
        AssetCondition::Good
    }
}

/// Tracked company asset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub category: AssetCategory,
    pub serial_number: Option<String>,
    pub purchase_date: DateTime<Utc>,
    pub purchase_price: f64,
    pub condition: AssetCondition,
    pub assigned_to: Option<Uuid>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub name: String,
    pub category: AssetCategory,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(deserialize_with = "deserialize_instant")]
    pub purchase_date: DateTime<Utc>,
    pub purchase_price: f64,
    #[serde(default)]
    pub condition: Option<AssetCondition>,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update; `null` clears optional fields such as `assignedTo`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetChanges {
    pub name: Option<String>,
    pub category: Option<AssetCategory>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub serial_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub purchase_date: Option<DateTime<Utc>>,
    pub purchase_price: Option<f64>,
    pub condition: Option<AssetCondition>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub assigned_to: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub notes: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl Asset {
    /// Creates an asset
    ///
    /// # Business Rules Enforced
    /// - Name must not be blank
    /// - Purchase price must be a non-negative number
    /// - Condition defaults to `Good`, `is_active` to true
    pub fn new(input: NewAsset, now: DateTime<Utc>) -> Result<Self, String> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: required_text("name", input.name)?,
            category: input.category,
            serial_number: optional_text(input.serial_number),
            purchase_date: input.purchase_date,
            purchase_price: validate_price(input.purchase_price)?,
            condition: input.condition.unwrap_or_default(),
            assigned_to: input.assigned_to,
            location: optional_text(input.location),
            notes: optional_text(input.notes),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, changes: AssetChanges, now: DateTime<Utc>) -> Result<(), String> {
        let mut next = self.clone();

        if let Some(name) = changes.name {
            next.name = required_text("name", name)?;
        }
        if let Some(category) = changes.category {
            next.category = category;
        }
        if let Some(serial_number) = changes.serial_number {
            next.serial_number = optional_text(serial_number);
        }
        if let Some(purchase_date) = changes.purchase_date {
            next.purchase_date = purchase_date;
        }
        if let Some(price) = changes.purchase_price {
            next.purchase_price = validate_price(price)?;
        }
        if let Some(condition) = changes.condition {
            next.condition = condition;
        }
        if let Some(assigned_to) = changes.assigned_to {
            next.assigned_to = assigned_to;
        }
        if let Some(location) = changes.location {
            next.location = optional_text(location);
        }
        if let Some(notes) = changes.notes {
            next.notes = optional_text(notes);
        }
        if let Some(is_active) = changes.is_active {
            next.is_active = is_active;
        }

        next.updated_at = now;
        *self = next;
        Ok(())
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }
}

fn validate_price(price: f64) -> Result<f64, String> {
    if !price.is_finite() || price < 0.0 {
        return Err("Purchase price must be a non-negative number".to_string());
    }
    Ok(price)
}
