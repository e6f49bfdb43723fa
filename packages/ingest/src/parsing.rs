//! Field-level parsing for crash dataset columns.
//!
//! Every function here returns `None` instead of failing so that a bad
//! field only drops that field's contribution, never the whole record.

use chrono::{NaiveDateTime, NaiveTime, Timelike as _};

/// Extracts the hour of day (0-23) from a crash time field.
///
/// Accepts wall-clock times (`"9:05"`, `"13:45"`, `"13:45:30"`) and full
/// ISO 8601 timestamps (`"2021-04-14T13:45:00.000"`).
#[must_use]
pub fn parse_crash_hour(s: &str) -> Option<u8> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let time = NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.time())
        })?;

    u8::try_from(time.hour()).ok()
}

/// Parses an injury count. Returns `None` for empty, non-numeric, or `NaN`
/// values.
#[must_use]
pub fn parse_count(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Parses a longitude/latitude pair. Returns `None` if either side is
/// missing, unparseable, or zero (the dataset's placeholder for "no fix").
#[must_use]
pub fn parse_lon_lat(lon: Option<&str>, lat: Option<&str>) -> Option<(f64, f64)> {
    let longitude = lon?.trim().parse::<f64>().ok()?;
    let latitude = lat?.trim().parse::<f64>().ok()?;
    if longitude == 0.0 || latitude == 0.0 || !longitude.is_finite() || !latitude.is_finite() {
        return None;
    }
    Some((longitude, latitude))
}

/// Trims a text field, mapping blank values to `None`.
#[must_use]
pub fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_wall_clock_time() {
        assert_eq!(parse_crash_hour("0:00"), Some(0));
        assert_eq!(parse_crash_hour("9:05"), Some(9));
        assert_eq!(parse_crash_hour("23:59"), Some(23));
    }

    #[test]
    fn parses_time_with_seconds() {
        assert_eq!(parse_crash_hour("13:45:30"), Some(13));
    }

    #[test]
    fn parses_full_timestamp() {
        assert_eq!(parse_crash_hour("2021-04-14T17:20:00.000"), Some(17));
    }

    #[test]
    fn rejects_invalid_time() {
        assert_eq!(parse_crash_hour(""), None);
        assert_eq!(parse_crash_hour("noon"), None);
        assert_eq!(parse_crash_hour("25:00"), None);
    }

    #[test]
    fn parses_counts() {
        assert_eq!(parse_count("2"), Some(2.0));
        assert_eq!(parse_count(" 1.5 "), Some(1.5));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count("NaN"), None);
    }

    #[test]
    fn parses_lon_lat() {
        let (lon, lat) = parse_lon_lat(Some("-73.9"), Some("40.7")).unwrap();
        assert!((lon - -73.9).abs() < f64::EPSILON);
        assert!((lat - 40.7).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_zero_or_missing_lon_lat() {
        assert!(parse_lon_lat(Some("0.0"), Some("40.7")).is_none());
        assert!(parse_lon_lat(None, Some("40.7")).is_none());
        assert!(parse_lon_lat(Some("-73.9"), Some("")).is_none());
    }

    #[test]
    fn blanks_become_none() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" Sedan "), Some("Sedan".to_string()));
    }
}
