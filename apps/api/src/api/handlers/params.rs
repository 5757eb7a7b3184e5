// Query-string parameters shared by the list and report handlers

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::domain::asset::AssetCategory;
use crate::domain::period::DateRange;
use crate::domain::repositories::{AssetFilter, EmployeeFilter};
use crate::reporting::period::{self, ComparisonPeriods};
use crate::reporting::ReportResult;

/// `startDate` / `endDate`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeParams {
    /// Both bounds or neither
    pub fn optional(&self) -> ReportResult<Option<DateRange>> {
        period::resolve_optional(self.start_date.as_deref(), self.end_date.as_deref())
    }

    /// Missing bounds fall back to the twelve months ending now
    pub fn trailing_year(&self, now: DateTime<Utc>) -> ReportResult<DateRange> {
        period::resolve_trailing_year(self.start_date.as_deref(), self.end_date.as_deref(), now)
    }

    /// Ledger monthly summaries: open-ended unless `endDate` is given
    pub fn since_year_ago(&self, now: DateTime<Utc>) -> ReportResult<DateRange> {
        period::resolve_since_year_ago(self.start_date.as_deref(), self.end_date.as_deref(), now)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeParams {
    pub current_start_date: Option<String>,
    pub current_end_date: Option<String>,
}

impl ComparativeParams {
    pub fn resolve(&self, now: DateTime<Utc>) -> ReportResult<ComparisonPeriods> {
        period::resolve_comparison(
            self.current_start_date.as_deref(),
            self.current_end_date.as_deref(),
            now,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<usize>,
}

impl ClientParams {
    pub fn range(&self) -> ReportResult<Option<DateRange>> {
        period::resolve_optional(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

/// Filters of the expense and income listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerListParams {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub client: Option<String>,
    #[serde(default)]
    pub calculate_total: bool,
}

impl LedgerListParams {
    pub fn range(&self) -> ReportResult<Option<DateRange>> {
        period::resolve_optional(self.start_date.as_deref(), self.end_date.as_deref())
    }

    pub fn category<T>(&self) -> Result<Option<T>, ApiError>
    where
        T: FromStr<Err = String>,
    {
        parse_label(self.category.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListParams {
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

impl From<EmployeeListParams> for EmployeeFilter {
    fn from(params: EmployeeListParams) -> Self {
        EmployeeFilter {
            department: params.department.filter(|d| !d.trim().is_empty()),
            is_active: params.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetListParams {
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub assigned_to: Option<Uuid>,
}

impl AssetListParams {
    pub fn filter(&self) -> Result<AssetFilter, ApiError> {
        Ok(AssetFilter {
            category: parse_label::<AssetCategory>(self.category.as_deref())?,
            is_active: self.is_active,
            assigned_to: self.assigned_to,
        })
    }
}

/// Parses an optional closed-set label; an unknown label is a 400
fn parse_label<T>(raw: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = String>,
{
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| value.parse().map_err(ApiError::bad_request))
        .transpose()
}
