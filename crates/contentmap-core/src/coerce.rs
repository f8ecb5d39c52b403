//! Value coercion primitives
//!
//! Boolean and number parsing are permissive: a value that does not parse
//! becomes `false` / `0.0`. Date parsing is strict and reports
//! [`Error::Conversion`] so the orchestrator can abort the build.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a boolean; only `true` (any case, surrounding whitespace ignored) is true
pub fn parse_bool(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

/// Parse a number, falling back to `0.0`
///
/// Only finite decimals count as numbers. Spellings such as `inf` or `NaN`
/// that `f64::from_str` accepts fall back like any other non-numeric text.
pub fn parse_number(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => {
            log::debug!("Could not parse '{}' as a number, using 0", raw);
            0.0
        }
    }
}

/// Parse a date-time
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC) and
/// a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(raw: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date);
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }

    match NaiveDate::parse_from_str(trimmed, NAIVE_DATE_FORMAT) {
        Ok(date) => {
            let naive = date.and_hms_opt(0, 0, 0).ok_or_else(|| Error::Conversion {
                value: raw.to_string(),
                target: "date".to_string(),
                message: "midnight is not representable".to_string(),
            })?;
            Ok(Utc.from_utc_datetime(&naive).fixed_offset())
        }
        Err(e) => Err(Error::Conversion {
            value: raw.to_string(),
            target: "date".to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(parse_bool(" TRUE "));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
        assert!(!parse_bool("yes"));
        assert!(!parse_bool("1"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), 42.0);
        assert_eq!(parse_number(" 3.5 "), 3.5);
        assert_eq!(parse_number("-0.25"), -0.25);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("1,000"), 0.0);
    }

    #[test]
    fn test_parse_number_rejects_non_finite_spellings() {
        for raw in ["inf", "-inf", "INF", "infinity", "Infinity", "NaN", "nan", "1e400"] {
            assert_eq!(parse_number(raw), 0.0, "'{}' should fall back to 0", raw);
        }
    }

    #[test]
    fn test_parse_date_rfc3339() {
        let date = parse_date("2024-03-15T10:30:00+02:00").unwrap();
        assert_eq!(date.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(date.hour(), 10);
    }

    #[test]
    fn test_parse_date_naive() {
        let date = parse_date("2024-03-15T10:30:00").unwrap();
        assert_eq!(date.offset().local_minus_utc(), 0);
        assert_eq!(date.minute(), 30);

        let date = parse_date("2024-03-15").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 15));
        assert_eq!(date.hour(), 0);
    }

    #[test]
    fn test_parse_date_failure() {
        let err = parse_date("next tuesday").unwrap_err();
        assert!(matches!(err, Error::Conversion { ref target, .. } if target == "date"));
    }
}
