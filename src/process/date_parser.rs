use chrono::{NaiveDate, NaiveDateTime};

use crate::process::utils::clean_str;

/// Canonical on-disk date encoding.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Datetime layout accepted alongside the column's date format; the time part is dropped.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse `raw` with the column's fixed `format`, falling back to a full
/// `YYYY-MM-DD HH:MM:SS` timestamp truncated to its date.
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, format)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .ok()
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_fixed_format() {
        assert_eq!(parse_date("2020-01-02", DATE_FORMAT), Some(ymd(2020, 1, 2)));
        assert_eq!(parse_date("\"2020-01-02\"", DATE_FORMAT), Some(ymd(2020, 1, 2)));
        assert_eq!(parse_date("01/02/2020", "%m/%d/%Y"), Some(ymd(2020, 1, 2)));
    }

    #[test]
    fn test_parse_timestamp_truncates() {
        assert_eq!(
            parse_date("2020-01-02 13:45:00", DATE_FORMAT),
            Some(ymd(2020, 1, 2))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date("", DATE_FORMAT), None);
        assert_eq!(parse_date("2020-13-01", DATE_FORMAT), None);
        assert_eq!(parse_date("yesterday", DATE_FORMAT), None);
    }
}
