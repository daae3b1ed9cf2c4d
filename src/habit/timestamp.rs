//! Checkoff timestamp text codec.
//!
//! Timestamps are naive local wall-clock instants. They are stored as
//! `YYYY-MM-DD HH:MM:SS`; a date-only value parses as midnight.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Storage representation written to the `checkoffs` and `habits` tables.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp `{input}`: expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS")]
pub struct ParseTimestampError {
    input: String,
}

/// Parse a timestamp in any accepted text form.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, ParseTimestampError> {
    let trimmed = input.trim();

    for format in DATE_TIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Local).naive_local());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| ParseTimestampError {
            input: input.to_string(),
        })
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

/// Current local time, truncated to whole seconds so it survives a storage round trip.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn date_only_parses_as_midnight() {
        assert_eq!(parse_timestamp("2024-10-05").unwrap(), at(2024, 10, 5, 0, 0, 0));
    }

    #[test]
    fn storage_format_parses() {
        assert_eq!(
            parse_timestamp("2024-10-05 13:45:10").unwrap(),
            at(2024, 10, 5, 13, 45, 10)
        );
    }

    #[test]
    fn iso_t_separator_and_fraction_parse() {
        let ts = parse_timestamp("2024-10-05T13:45:10.250").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 10, 5).unwrap());
        assert_eq!(ts.hour(), 13);
    }

    #[test]
    fn minute_precision_parses() {
        assert_eq!(
            parse_timestamp("2024-10-05 07:30").unwrap(),
            at(2024, 10, 5, 7, 30, 0)
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse_timestamp("  2024-01-01\n").unwrap(), at(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(err.to_string().contains("yesterday"));
        assert!(parse_timestamp("2024-13-01").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn format_uses_storage_layout() {
        assert_eq!(format_timestamp(&at(2024, 3, 9, 8, 5, 1)), "2024-03-09 08:05:01");
    }

    #[test]
    fn now_has_no_subsecond_part() {
        assert_eq!(now().nanosecond(), 0);
    }
}
