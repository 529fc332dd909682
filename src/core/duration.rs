use chrono::NaiveDate;

use crate::models::SpanUnit;

/// Number of billable units between two dates
///
/// Days are counted inclusively, nights exclude the final day. A same-day
/// selection always spans one unit and a reversed range spans none.
#[inline]
pub fn calculate_duration(start: NaiveDate, end: NaiveDate, unit: SpanUnit) -> u32 {
    if start > end {
        return 0;
    }
    if start == end {
        return 1;
    }

    let diff = u32::try_from((end - start).num_days()).unwrap_or(u32::MAX);
    match unit {
        SpanUnit::Day => diff.saturating_add(1),
        SpanUnit::Night => diff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_day_unit() {
        assert_eq!(calculate_duration(date("2021-01-01"), date("2021-01-01"), SpanUnit::Day), 1);
        assert_eq!(calculate_duration(date("2021-01-01"), date("2021-01-05"), SpanUnit::Day), 5);
        assert_eq!(calculate_duration(date("2021-01-05"), date("2021-01-01"), SpanUnit::Day), 0);
    }

    #[test]
    fn test_night_unit() {
        assert_eq!(calculate_duration(date("2021-01-01"), date("2021-01-05"), SpanUnit::Night), 4);
        assert_eq!(calculate_duration(date("2021-01-01"), date("2021-01-01"), SpanUnit::Night), 1);
        assert_eq!(calculate_duration(date("2021-01-02"), date("2021-01-01"), SpanUnit::Night), 0);
    }

    #[test]
    fn test_spans_month_and_leap_day() {
        assert_eq!(calculate_duration(date("2024-02-27"), date("2024-03-02"), SpanUnit::Day), 5);
        assert_eq!(calculate_duration(date("2021-12-30"), date("2022-01-02"), SpanUnit::Night), 3);
    }
}
