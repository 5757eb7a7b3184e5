// Period resolver
// Turns optional wire dates into concrete inclusive ranges

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};

use super::error::{ReportError, ReportResult};
use crate::domain::period::{parse_instant, DateRange, MAX_YEAR};

/// A report period and the equally long period right before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonPeriods {
    pub current: DateRange,
    pub previous: DateRange,
}

/// Parses one named query parameter
pub fn parse_param(name: &str, raw: Option<&str>) -> ReportResult<Option<DateTime<Utc>>> {
    raw.map(|value| {
        parse_instant(value).map_err(|e| ReportError::Validation(format!("{}: {}", name, e)))
    })
    .transpose()
}

fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> ReportResult<DateRange> {
    DateRange::new(start, end).map_err(ReportError::Validation)
}

/// Shifts a (year, month) pair by `delta` months
fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn first_of_month(year: i32, month: u32) -> ReportResult<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| ReportError::Validation(format!("Month {}-{:02} is out of range", year, month)))
}

/// The whole calendar month `(year, month)`: first instant to last instant
pub fn month_range(year: i32, month: u32) -> ReportResult<DateRange> {
    let start = first_of_month(year, month)?;
    let (next_year, next_month) = shift_month(year, month, 1);
    let end = first_of_month(next_year, next_month)? - Duration::microseconds(1);
    range(start, end)
}

/// The calendar month containing `now`
pub fn current_month(now: DateTime<Utc>) -> ReportResult<DateRange> {
    month_range(now.year(), now.month())
}

/// Optional filter range: both bounds or neither
pub fn resolve_optional(start: Option<&str>, end: Option<&str>) -> ReportResult<Option<DateRange>> {
    let start = parse_param("startDate", start)?;
    let end = parse_param("endDate", end)?;

    match (start, end) {
        (Some(start), Some(end)) => range(start, end).map(Some),
        (None, None) => Ok(None),
        _ => Err(ReportError::Validation(
            "startDate and endDate must be supplied together".to_string(),
        )),
    }
}

/// Range ending at `endDate` (default `now`) and starting at `startDate`
/// (default twelve months before the end)
pub fn resolve_trailing_year(
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Utc>,
) -> ReportResult<DateRange> {
    let end = parse_param("endDate", end)?.unwrap_or(now);
    let start = match parse_param("startDate", start)? {
        Some(start) => start,
        None => end.checked_sub_months(Months::new(12)).ok_or_else(|| {
            ReportError::Validation("endDate is too early to look back a year".to_string())
        })?,
    };
    range(start, end)
}

/// Ledger monthly window: like [`resolve_trailing_year`], but without an
/// `endDate` the range stays open so future-dated entries are counted
pub fn resolve_since_year_ago(
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Utc>,
) -> ReportResult<DateRange> {
    if end.is_some() {
        return resolve_trailing_year(start, end, now);
    }
    let start = match parse_param("startDate", start)? {
        Some(start) => start,
        None => now.checked_sub_months(Months::new(12)).ok_or_else(|| {
            ReportError::Validation("Current time is too early to look back a year".to_string())
        })?,
    };
    range(start, open_end()?)
}

/// Last representable instant of the supported calendar
fn open_end() -> ReportResult<DateTime<Utc>> {
    Ok(month_range(MAX_YEAR, 12)?.end())
}

/// Current period (default: first day of the month eleven months before
/// `now`'s month through `now`) and the previous period of the same length
/// ending one day before the current one starts
pub fn resolve_comparison(
    current_start: Option<&str>,
    current_end: Option<&str>,
    now: DateTime<Utc>,
) -> ReportResult<ComparisonPeriods> {
    let end = parse_param("currentEndDate", current_end)?.unwrap_or(now);
    let start = match parse_param("currentStartDate", current_start)? {
        Some(start) => start,
        None => {
            let (year, month) = shift_month(end.year(), end.month(), -11);
            first_of_month(year, month)?
        }
    };
    let current = range(start, end)?;
    Ok(ComparisonPeriods {
        current,
        previous: previous_period(current)?,
    })
}

/// Duration-preserving predecessor: ends one day before `current` starts
///
/// # Arguments
/// * `current` - The report period being compared
///
/// # Returns
/// A range of the same length as `current`, or a validation error when it
/// would fall outside the representable calendar
pub fn previous_period(current: DateRange) -> ReportResult<DateRange> {
    let out_of_range = || ReportError::Validation("Previous period is out of range".to_string());

    let previous_end = current
        .start()
        .checked_sub_signed(Duration::days(1))
        .ok_or_else(out_of_range)?;
    let previous_start = previous_end
        .checked_sub_signed(current.duration())
        .ok_or_else(out_of_range)?;
    range(previous_start, previous_end)
}

/// Every calendar month touched by `range`, ascending
pub fn months_in(range: DateRange) -> Vec<(i32, u32)> {
    let (mut year, mut month) = (range.start().year(), range.start().month());
    let last = (range.end().year(), range.end().month());

    let mut months = Vec::new();
    while (year, month) <= last {
        months.push((year, month));
        (year, month) = shift_month(year, month, 1);
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn shift_month_wraps_years() {
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2024, 1, -1), (2023, 12));
        assert_eq!(shift_month(2024, 11, -11), (2023, 12));
    }

    #[test]
    fn current_month_spans_whole_month() {
        let now = Utc.with_ymd_and_hms(2024, 2, 17, 13, 45, 0).unwrap();
        let month = current_month(now).unwrap();

        assert_eq!(month.start(), utc(2024, 2, 1));
        assert_eq!(month.end().day(), 29);
        assert!(month.contains(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()));
        assert!(!month.contains(utc(2024, 3, 1)));
    }

    #[test]
    fn optional_range_requires_both_bounds() {
        assert_eq!(resolve_optional(None, None).unwrap(), None);
        assert!(matches!(
            resolve_optional(Some("2024-01-01"), None),
            Err(ReportError::Validation(_))
        ));

        let range = resolve_optional(Some("2024-01-01"), Some("2024-02-28"))
            .unwrap()
            .unwrap();
        assert_eq!(range.start(), utc(2024, 1, 1));
        assert_eq!(range.end(), utc(2024, 2, 28));
    }

    #[test]
    fn malformed_date_is_validation_error() {
        let err = resolve_optional(Some("01/02/2024"), Some("2024-02-28")).unwrap_err();
        match err {
            ReportError::Validation(message) => assert!(message.starts_with("startDate:")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reversed_range_rejected() {
        assert!(resolve_optional(Some("2024-03-01"), Some("2024-02-01")).is_err());
    }

    #[test]
    fn trailing_year_defaults() {
        let now = utc(2025, 6, 15);
        let range = resolve_trailing_year(None, None, now).unwrap();
        assert_eq!(range.start(), utc(2024, 6, 15));
        assert_eq!(range.end(), now);

        let range = resolve_trailing_year(None, Some("2024-03-31"), now).unwrap();
        assert_eq!(range.start(), utc(2023, 3, 31));
    }

    #[test]
    fn year_ago_window_is_open_ended_without_end_date() {
        let now = utc(2025, 6, 15);
        let range = resolve_since_year_ago(None, None, now).unwrap();
        assert_eq!(range.start(), utc(2024, 6, 15));
        assert!(range.contains(utc(2030, 1, 1)));
        assert_eq!(range.end().year(), MAX_YEAR);

        let bounded = resolve_since_year_ago(None, Some("2025-03-31"), now).unwrap();
        assert_eq!(bounded.start(), utc(2024, 3, 31));
        assert_eq!(bounded.end(), utc(2025, 3, 31));
    }

    #[test]
    fn previous_period_preserves_duration() {
        let current = DateRange::new(utc(2024, 3, 1), utc(2024, 3, 31)).unwrap();
        let previous = previous_period(current).unwrap();

        assert_eq!(previous.end(), utc(2024, 2, 29));
        assert_eq!(previous.start(), utc(2024, 1, 30));
        assert_eq!(previous.duration(), current.duration());
    }

    #[test]
    fn previous_period_past_calendar_start_is_validation_error() {
        let earliest = DateTime::<Utc>::MIN_UTC;
        let current = DateRange::new(earliest, utc(2024, 1, 1)).unwrap();
        assert!(matches!(
            previous_period(current),
            Err(ReportError::Validation(_))
        ));
    }

    #[test]
    fn extreme_years_rejected_before_comparison() {
        let now = utc(2024, 6, 1);
        assert!(matches!(
            resolve_comparison(Some("-200000-01-01"), Some("+200000-01-01"), now),
            Err(ReportError::Validation(_))
        ));
    }

    #[test]
    fn widest_comparison_resolves() {
        let now = utc(2024, 6, 1);
        let periods = resolve_comparison(Some("0001-01-01"), Some("9999-12-31"), now).unwrap();
        assert_eq!(periods.previous.duration(), periods.current.duration());
    }

    #[test]
    fn widest_trend_is_bounded() {
        let now = utc(2024, 6, 1);
        assert!(resolve_trailing_year(Some("-200000-01-01"), Some("+200000-01-01"), now).is_err());

        let range = resolve_trailing_year(Some("0001-01-01"), Some("9999-12-31"), now).unwrap();
        assert_eq!(months_in(range).len(), 9999 * 12);
    }

    #[test]
    fn comparison_defaults_to_twelve_months() {
        let now = Utc.with_ymd_and_hms(2024, 11, 20, 8, 0, 0).unwrap();
        let periods = resolve_comparison(None, None, now).unwrap();

        assert_eq!(periods.current.start(), utc(2023, 12, 1));
        assert_eq!(periods.current.end(), now);
        assert_eq!(periods.previous.end(), utc(2023, 11, 30));
        assert_eq!(periods.previous.duration(), periods.current.duration());
    }

    #[test]
    fn months_in_covers_partial_months() {
        let range = DateRange::new(utc(2024, 11, 15), utc(2025, 2, 3)).unwrap();
        assert_eq!(
            months_in(range),
            vec![(2024, 11), (2024, 12), (2025, 1), (2025, 2)]
        );
    }

    #[test]
    fn twelve_month_range_has_twelve_months() {
        let range = DateRange::new(utc(2024, 1, 1), utc(2024, 12, 31)).unwrap();
        assert_eq!(months_in(range).len(), 12);
    }
}
