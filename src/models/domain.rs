use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::dates::{is_valid_date, parse_date_part, split_time};

/// Opaque identifier of a post handed over by the search pipeline
pub type PostId = u64;

/// Facet type registered with the search pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FacetType {
    pub name: &'static str,
    pub label: &'static str,
}

/// The "availability" facet: two dates and a quantity
pub const AVAILABILITY_FACET: FacetType = FacetType {
    name: "availability",
    label: "Availability",
};

/// One raw element of a submitted facet value
///
/// The quantity slot arrives either as a JSON number or as the string
/// typed into the form input, so both shapes are accepted. Clients that
/// clear an input may send `null`, which counts as an empty slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetValue {
    Number(i64),
    Float(f64),
    Text(String),
    Null,
}

impl FacetValue {
    fn is_empty(&self) -> bool {
        match self {
            FacetValue::Number(n) => *n == 0,
            FacetValue::Float(f) => *f == 0.0,
            FacetValue::Text(s) => s.is_empty() || s == "0",
            FacetValue::Null => true,
        }
    }

    fn as_text(&self) -> String {
        match self {
            FacetValue::Number(n) => n.to_string(),
            FacetValue::Float(f) => f.to_string(),
            FacetValue::Text(s) => s.clone(),
            FacetValue::Null => String::new(),
        }
    }
}

impl From<&str> for FacetValue {
    fn from(value: &str) -> Self {
        FacetValue::Text(value.to_string())
    }
}

impl From<i64> for FacetValue {
    fn from(value: i64) -> Self {
        FacetValue::Number(value)
    }
}

/// User selection for the availability facet, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSelection {
    pub start: String,
    pub end: String,
    pub quantity: u32,
}

impl Default for DateSelection {
    fn default() -> Self {
        Self {
            start: String::new(),
            end: String::new(),
            quantity: 1,
        }
    }
}

impl DateSelection {
    /// Build a selection from the ordered `[start, end, quantity]` facet value.
    ///
    /// Missing or empty elements fall back to `""`, `""` and `1`.
    pub fn from_values(values: &[FacetValue]) -> Self {
        let text_at = |index: usize| {
            values
                .get(index)
                .filter(|v| !v.is_empty())
                .map(FacetValue::as_text)
                .unwrap_or_default()
        };

        Self {
            start: text_at(0),
            end: text_at(1),
            quantity: coerce_quantity(values.get(2)),
        }
    }

    /// Validate both dates, yielding the window the query builder works on.
    ///
    /// Returns `None` when either date is empty or malformed.
    pub fn validate(&self) -> Option<StayWindow> {
        if !is_valid_date(&self.start) || !is_valid_date(&self.end) {
            return None;
        }

        Some(StayWindow {
            start: parse_date_part(&self.start)?,
            end: parse_date_part(&self.end)?,
            start_time: split_time(&self.start).map(str::to_string),
            persons: self.quantity,
        })
    }

    /// Label shown for the active selection, e.g. `2021-03-01 - 2021-03-03`
    pub fn label(&self) -> String {
        format!("{} - {}", self.start, self.end)
    }
}

/// Integer coercion for the quantity slot, clamped to at least one person.
///
/// Text is read up to its first non-digit, so `"3 guests"` counts as 3 and
/// `"abc"` falls back to 1. Floats are truncated towards zero.
fn coerce_quantity(value: Option<&FacetValue>) -> u32 {
    let raw = match value {
        None | Some(FacetValue::Null) => return 1,
        Some(FacetValue::Number(n)) => *n,
        // saturating cast, NaN becomes 0
        Some(FacetValue::Float(f)) => f.trunc() as i64,
        Some(FacetValue::Text(s)) => leading_integer(s),
    };

    if raw < 1 {
        1
    } else {
        u32::try_from(raw).unwrap_or(u32::MAX)
    }
}

fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// A selection whose dates passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// `HH:MM` part of the start value, when one was submitted
    pub start_time: Option<String>,
    pub persons: u32,
}

/// Booking granularity of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Day,
    /// Accommodation products, billed per night
    Night,
    Hour,
}

impl DurationUnit {
    /// Unit used when counting the selected span
    pub fn span_unit(self) -> SpanUnit {
        match self {
            DurationUnit::Night => SpanUnit::Night,
            DurationUnit::Day | DurationUnit::Hour => SpanUnit::Day,
        }
    }
}

/// Counting unit for [`crate::core::calculate_duration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanUnit {
    Day,
    Night,
}

/// Arguments handed to the booking engine's bookability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryArgs {
    pub persons: u32,
    pub duration: u32,
    pub start_date_year: i32,
    pub start_date_month: u32,
    pub start_date_day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<String>,
    pub start_date_to_year: i32,
    pub start_date_to_month: u32,
    pub start_date_to_day: u32,
}

impl QueryArgs {
    /// First requested day, if the year/month/day triple is a real date
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_date_year, self.start_date_month, self.start_date_day)
    }

    /// Last selected day, if the year/month/day triple is a real date
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            self.start_date_to_year,
            self.start_date_to_month,
            self.start_date_to_day,
        )
    }
}
