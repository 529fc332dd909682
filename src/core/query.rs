use chrono::Datelike;

use crate::core::duration::calculate_duration;
use crate::models::{DurationUnit, QueryArgs, StayWindow};

/// Build the bookability query for one product
///
/// Accommodation products count nights, everything else counts days. The
/// start time is only forwarded to hour-based products.
pub fn build_query_args(window: &StayWindow, unit: DurationUnit) -> QueryArgs {
    let start_date_time = match unit {
        DurationUnit::Hour => window.start_time.clone(),
        DurationUnit::Day | DurationUnit::Night => None,
    };

    QueryArgs {
        persons: window.persons,
        duration: calculate_duration(window.start, window.end, unit.span_unit()),
        start_date_year: window.start.year(),
        start_date_month: window.start.month(),
        start_date_day: window.start.day(),
        start_date_time,
        start_date_to_year: window.end.year(),
        start_date_to_month: window.end.month(),
        start_date_to_day: window.end.day(),
    }
}
