use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::period::{deserialize_nullable, deserialize_optional_instant};
use super::user::value_objects::Email;

/// Employee record
///
/// Employees are soft-retired through `is_active`; analytics read both
/// active and inactive records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub department: String,
    pub email: Email,
    pub phone: Option<String>,
    pub salary: f64,
    pub join_date: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an employee
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub position: String,
    pub department: String,
    pub email: Email,
    #[serde(default)]
    pub phone: Option<String>,
    pub salary: f64,
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub join_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub email: Option<Email>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub phone: Option<Option<String>>,
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_instant")]
    pub join_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl Employee {
    /// Creates an employee, defaulting `join_date` to `now` and `is_active` to true
    ///
    /// # Business Rules Enforced
    /// - Name, position and department must not be blank
    /// - Salary must be a non-negative number
    pub fn new(input: NewEmployee, now: DateTime<Utc>) -> Result<Self, String> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: required_text("name", input.name)?,
            position: required_text("position", input.position)?,
            department: required_text("department", input.department)?,
            email: input.email,
            phone: optional_text(input.phone),
            salary: validate_salary(input.salary)?,
            join_date: input.join_date.unwrap_or(now),
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update, validating every supplied field
    ///
    /// Nothing is modified when any field is invalid.
    pub fn apply(&mut self, changes: EmployeeChanges, now: DateTime<Utc>) -> Result<(), String> {
        let mut next = self.clone();

        if let Some(name) = changes.name {
            next.name = required_text("name", name)?;
        }
        if let Some(position) = changes.position {
            next.position = required_text("position", position)?;
        }
        if let Some(department) = changes.department {
            next.department = required_text("department", department)?;
        }
        if let Some(email) = changes.email {
            next.email = email;
        }
        if let Some(phone) = changes.phone {
            next.phone = optional_text(phone);
        }
        if let Some(salary) = changes.salary {
            next.salary = validate_salary(salary)?;
        }
        if let Some(join_date) = changes.join_date {
            next.join_date = join_date;
        }
        if let Some(is_active) = changes.is_active {
            next.is_active = is_active;
        }

        next.updated_at = now;
        *self = next;
        Ok(())
    }
}

fn validate_salary(salary: f64) -> Result<f64, String> {
    if !salary.is_finite() || salary < 0.0 {
        return Err("Salary must be a non-negative number".to_string());
    }
    Ok(salary)
}

/// Trims a required text field, rejecting blank values
pub(crate) fn required_text(field: &str, value: String) -> Result<String, String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(format!("{} cannot be empty", capitalize(field)));
    }
    Ok(value)
}

/// Trims an optional text field, mapping blank values to `None`
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
