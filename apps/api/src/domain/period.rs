// Date ranges and wire-date parsing shared by the store filters and reports

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Closed-closed instant range `[start, end]`
///
/// # Invariants
/// - `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a range, rejecting a start that lies after the end
    ///
    /// # Example
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use office_api::domain::period::DateRange;
    ///
    /// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
    /// let range = DateRange::new(start, end).expect("ordered range");
    /// assert!(range.contains(end));
    /// assert!(DateRange::new(end, start).is_err());
    /// ```
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, String> {
        if start > end {
            return Err(format!(
                "Start date {} is after end date {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Both bounds are inclusive
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Earliest and latest calendar years a wire date may carry
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Parses a wire date into a UTC instant
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as
/// UTC) and plain `YYYY-MM-DD` (midnight UTC).
///
/// # Arguments
/// * `raw` - The date string as received on the wire
///
/// # Returns
/// The UTC instant, or an error message when the string is not a date or
/// its year lies outside `MIN_YEAR..=MAX_YEAR`
///
/// # Example
/// ```
/// use office_api::domain::period::parse_instant;
///
/// assert!(parse_instant("2024-01-15").is_ok());
/// assert!(parse_instant("+200000-01-01").is_err());
/// ```
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    let instant = parse_any(raw).ok_or_else(|| format!("Invalid date: '{}'", raw))?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&instant.year()) {
        return Err(format!(
            "Date '{}' is out of range: years {}-{} are supported",
            raw, MIN_YEAR, MAX_YEAR
        ));
    }
    Ok(instant)
}

fn parse_any(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

/// `deserialize_with` adapter for required wire dates
pub fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).map_err(serde::de::Error::custom)
}

/// `deserialize_with` adapter for optional wire dates
pub fn deserialize_optional_instant<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_instant(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
///
/// Use together with `#[serde(default)]`.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn parses_plain_date_as_midnight_utc() {
        assert_eq!(parse_instant("2024-01-15").unwrap(), utc(2024, 1, 15, 0, 0, 0));
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        assert_eq!(
            parse_instant("2024-03-01T10:00:00+02:00").unwrap(),
            utc(2024, 3, 1, 8, 0, 0)
        );
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        assert_eq!(
            parse_instant("2024-03-01T10:30:00").unwrap(),
            utc(2024, 3, 1, 10, 30, 0)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_instant("yesterday").is_err());
        assert!(parse_instant("2024-13-01").is_err());
        assert!(parse_instant("").is_err());
    }

    #[test]
    fn rejects_years_outside_four_digits() {
        assert!(parse_instant("-200000-01-01").is_err());
        assert!(parse_instant("+200000-01-01").is_err());
        assert!(parse_instant("0000-12-31").is_err());
        assert!(parse_instant("10000-01-01T00:00:00").is_err());
        assert_eq!(parse_instant("0001-01-01").unwrap(), utc(1, 1, 1, 0, 0, 0));
        assert_eq!(parse_instant("9999-12-31").unwrap(), utc(9999, 12, 31, 0, 0, 0));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = DateRange::new(utc(2024, 1, 1, 0, 0, 0), utc(2024, 1, 31, 0, 0, 0)).unwrap();
        assert!(range.contains(utc(2024, 1, 1, 0, 0, 0)));
        assert!(range.contains(utc(2024, 1, 31, 0, 0, 0)));
        assert!(!range.contains(utc(2024, 1, 31, 0, 0, 1)));
        assert_eq!(range.duration(), Duration::days(30));
    }

    #[test]
    fn nullable_distinguishes_null_from_missing() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "deserialize_nullable")]
            field: Option<Option<u32>>,
        }

        let missing: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"field": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"field": 3}"#).unwrap();
        assert_eq!(missing.field, None);
        assert_eq!(null.field, Some(None));
        assert_eq!(set.field, Some(Some(3)));
    }
}
