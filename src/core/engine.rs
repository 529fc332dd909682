use thiserror::Error;

use crate::models::{DurationUnit, PostId, QueryArgs};

/// Reasons a booking engine refuses a query outright
///
/// These are distinct from a clean "not available" answer, which is
/// `Ok(false)` from [`BookableProduct::is_bookable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("The minimum persons per group is {min}")]
    TooFewPersons { min: u32 },

    #[error("The maximum persons per group is {max}")]
    TooManyPersons { max: u32 },

    #[error("The minimum duration is {min}")]
    DurationTooShort { min: u32 },

    #[error("The maximum duration is {max}")]
    DurationTooLong { max: u32 },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Booking engine error: {0}")]
    Engine(String),
}

/// What the availability filter needs to know about a product
pub trait BookableProduct {
    /// Booking granularity configured on the product
    fn duration_unit(&self) -> DurationUnit;

    /// Whether the product supports date-range booking at all
    fn is_booking_type(&self) -> bool;

    /// Ask the engine whether the product can be booked for `args`
    fn is_bookable(&self, args: &QueryArgs) -> Result<bool, BookingError>;
}

/// Lookup of candidate posts in the booking engine
pub trait ProductCatalog {
    type Product: BookableProduct;

    /// The product behind `id`, or `None` when the post is not a product
    fn product(&self, id: PostId) -> Option<&Self::Product>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BookingError::TooManyPersons { max: 4 }.to_string(),
            "The maximum persons per group is 4"
        );
        assert_eq!(
            BookingError::Engine("timeout".to_string()).to_string(),
            "Booking engine error: timeout"
        );
    }
}
