//! Facet Availability - date range and party size facet for booking products
//!
//! Filters the candidate posts of a faceted search down to the products a
//! booking engine reports as bookable for the selected dates and quantity.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{
    calculate_duration, is_valid_date, AvailabilityFilter, AvailabilityResult, BookableProduct,
    BookingError, ErrorSink, ProductCatalog, ResultTransform,
};
pub use models::{DateSelection, DurationUnit, FacetValue, PostId, QueryArgs, SpanUnit};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        assert!(is_valid_date("2021-02-28"));
        assert_eq!(DateSelection::default().quantity, 1);
    }
}
