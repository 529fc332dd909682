use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Check that a facet date is a real `YYYY-MM-DD` or `YYYY-MM-DD HH:MM` value
///
/// The parsed value must format back to exactly the same string, which
/// rules out unpadded fields as well as impossible dates like `2021-02-30`.
pub fn is_valid_date(date: &str) -> bool {
    match date.len() {
        10 => NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map(|d| d.format(DATE_FORMAT).to_string() == date)
            .unwrap_or(false),
        16 => NaiveDateTime::parse_from_str(date, DATETIME_FORMAT)
            .map(|dt| dt.format(DATETIME_FORMAT).to_string() == date)
            .unwrap_or(false),
        _ => false,
    }
}

/// Calendar date of a facet value, ignoring any time of day
pub fn parse_date_part(value: &str) -> Option<NaiveDate> {
    let date = value.split(' ').next()?;
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Time of day following the date, if present
#[inline]
pub fn split_time(value: &str) -> Option<&str> {
    value
        .split_once(' ')
        .map(|(_, time)| time)
        .filter(|time| !time.is_empty())
}
