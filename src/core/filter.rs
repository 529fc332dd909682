use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::engine::{BookableProduct, ProductCatalog};
use crate::core::hooks::{ErrorSink, IdentityTransform, ResultTransform, TracingErrorSink};
use crate::core::query::build_query_args;
use crate::models::{DateSelection, PostId};

/// Result of one availability filter pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityResult {
    /// Matching ids in input order, after the result transform
    pub matches: Vec<PostId>,
    pub total_candidates: usize,
    /// Booking products actually sent to the engine
    pub checked: usize,
    pub engine_errors: usize,
    /// The deadline expired before every candidate was checked
    pub truncated: bool,
}

/// Availability facet orchestrator
///
/// # Pipeline
/// 1. Validate the selected dates (no valid dates, no results)
/// 2. Skip non-products and products that are not bookable types
/// 3. Build per-product query arguments
/// 4. Keep products the booking engine accepts
/// 5. Hand the match set to the result transform
#[derive(Clone)]
pub struct AvailabilityFilter {
    transform: Arc<dyn ResultTransform>,
    error_sink: Arc<dyn ErrorSink>,
    deadline: Option<Duration>,
}

impl AvailabilityFilter {
    pub fn new() -> Self {
        Self {
            transform: Arc::new(IdentityTransform),
            error_sink: Arc::new(TracingErrorSink),
            deadline: None,
        }
    }

    pub fn with_result_transform(mut self, transform: impl ResultTransform + 'static) -> Self {
        self.transform = Arc::new(transform);
        self
    }

    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.error_sink = Arc::new(sink);
        self
    }

    /// Stop checking candidates once `deadline` has elapsed
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Filter `candidates` down to the products bookable for `selection`
    ///
    /// # Arguments
    /// * `catalog` - Booking engine lookup for candidate posts
    /// * `candidates` - Unfiltered post ids from the search pipeline
    /// * `selection` - The submitted facet value
    pub fn filter<C>(
        &self,
        catalog: &C,
        candidates: &[PostId],
        selection: &DateSelection,
    ) -> AvailabilityResult
    where
        C: ProductCatalog + ?Sized,
    {
        let total_candidates = candidates.len();

        let Some(window) = selection.validate() else {
            tracing::debug!(
                "Availability selection '{}' / '{}' incomplete or invalid, returning no results",
                selection.start,
                selection.end
            );
            return AvailabilityResult {
                matches: self.transform.transform(Vec::new()),
                total_candidates,
                ..AvailabilityResult::default()
            };
        };

        let started = Instant::now();
        let mut matches = Vec::new();
        let mut checked = 0;
        let mut engine_errors = 0;
        let mut truncated = false;

        for &post_id in candidates {
            if let Some(deadline) = self.deadline {
                if started.elapsed() > deadline {
                    tracing::warn!(
                        "Availability deadline of {:?} exceeded after {} checks, returning partial results",
                        deadline,
                        checked
                    );
                    truncated = true;
                    break;
                }
            }

            let Some(product) = catalog.product(post_id) else {
                continue;
            };
            if !product.is_booking_type() {
                continue;
            }

            let args = build_query_args(&window, product.duration_unit());
            checked += 1;

            match product.is_bookable(&args) {
                Ok(true) => matches.push(post_id),
                Ok(false) => {}
                Err(e) => {
                    engine_errors += 1;
                    self.error_sink.report(post_id, &e);
                }
            }
        }

        tracing::debug!(
            "Availability {} - {} for {} persons: {} of {} checked products available ({} candidates, {} engine errors)",
            window.start,
            window.end,
            window.persons,
            matches.len(),
            checked,
            total_candidates,
            engine_errors
        );

        AvailabilityResult {
            matches: self.transform.transform(matches),
            total_candidates,
            checked,
            engine_errors,
            truncated,
        }
    }
}

impl Default for AvailabilityFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AvailabilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilityFilter")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::BookingError;
    use crate::models::{DurationUnit, FacetValue, QueryArgs};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StubProduct {
        unit: DurationUnit,
        booking: bool,
        answer: Result<bool, BookingError>,
        delay: Duration,
        seen: Mutex<Vec<QueryArgs>>,
    }

    impl BookableProduct for StubProduct {
        fn duration_unit(&self) -> DurationUnit {
            self.unit
        }

        fn is_booking_type(&self) -> bool {
            self.booking
        }

        fn is_bookable(&self, args: &QueryArgs) -> Result<bool, BookingError> {
            self.seen.lock().unwrap().push(args.clone());
            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            self.answer.clone()
        }
    }

    #[derive(Default)]
    struct StubCatalog {
        products: HashMap<PostId, StubProduct>,
    }

    impl StubCatalog {
        fn add(mut self, id: PostId, unit: DurationUnit, booking: bool, answer: Result<bool, BookingError>) -> Self {
            self.products.insert(
                id,
                StubProduct {
                    unit,
                    booking,
                    answer,
                    delay: Duration::ZERO,
                    seen: Mutex::new(Vec::new()),
                },
            );
            self
        }

        fn slow(mut self, id: PostId, delay: Duration) -> Self {
            if let Some(product) = self.products.get_mut(&id) {
                product.delay = delay;
            }
            self
        }
    }

    impl ProductCatalog for StubCatalog {
        type Product = StubProduct;

        fn product(&self, id: PostId) -> Option<&StubProduct> {
            self.products.get(&id)
        }
    }

    fn selection(start: &str, end: &str, quantity: i64) -> DateSelection {
        DateSelection::from_values(&[FacetValue::from(start), FacetValue::from(end), FacetValue::from(quantity)])
    }

    #[test]
    fn test_end_to_end_scenario() {
        let catalog = StubCatalog::default()
            .add(1, DurationUnit::Day, true, Ok(true))
            .add(2, DurationUnit::Day, false, Ok(true))
            .add(3, DurationUnit::Night, true, Ok(true));

        let result = AvailabilityFilter::new().filter(&catalog, &[1, 2, 3], &selection("2021-03-01", "2021-03-03", 2));

        assert_eq!(result.matches, vec![1, 3]);
        assert_eq!(result.checked, 2);
        assert_eq!(catalog.products[&1].seen.lock().unwrap()[0].duration, 3);
        assert_eq!(catalog.products[&3].seen.lock().unwrap()[0].duration, 2);
        assert!(catalog.products[&2].seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_fail_closed_without_dates() {
        let catalog = StubCatalog::default().add(1, DurationUnit::Day, true, Ok(true));

        let result = AvailabilityFilter::new().filter(&catalog, &[1], &selection("", "2021-01-05", 1));

        assert!(result.matches.is_empty());
        assert_eq!(result.total_candidates, 1);
        assert_eq!(result.checked, 0);
    }

    #[test]
    fn test_unknown_posts_are_skipped() {
        let catalog = StubCatalog::default().add(5, DurationUnit::Day, true, Ok(true));

        let result = AvailabilityFilter::new().filter(&catalog, &[4, 5, 6], &selection("2021-03-01", "2021-03-02", 1));

        assert_eq!(result.matches, vec![5]);
    }

    #[test]
    fn test_engine_errors_are_reported_and_excluded() {
        let catalog = StubCatalog::default()
            .add(1, DurationUnit::Day, true, Err(BookingError::TooManyPersons { max: 1 }))
            .add(2, DurationUnit::Day, true, Ok(false))
            .add(3, DurationUnit::Day, true, Ok(true));
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let reported = Arc::clone(&reported);
            move |id: PostId, e: &BookingError| reported.lock().unwrap().push((id, e.clone()))
        };

        let result = AvailabilityFilter::new()
            .with_error_sink(sink)
            .filter(&catalog, &[1, 2, 3], &selection("2021-03-01", "2021-03-02", 3));

        assert_eq!(result.matches, vec![3]);
        assert_eq!(result.engine_errors, 1);
        assert_eq!(*reported.lock().unwrap(), vec![(1, BookingError::TooManyPersons { max: 1 })]);
    }

    #[test]
    fn test_transform_runs_on_every_path() {
        let catalog = StubCatalog::default().add(1, DurationUnit::Day, true, Ok(true));
        let filter = AvailabilityFilter::new().with_result_transform(|mut ids: Vec<PostId>| {
            ids.push(99);
            ids
        });

        let matched = filter.filter(&catalog, &[1], &selection("2021-03-01", "2021-03-02", 1));
        assert_eq!(matched.matches, vec![1, 99]);

        let empty = filter.filter(&catalog, &[1], &selection("", "", 1));
        assert_eq!(empty.matches, vec![99]);
    }

    #[test]
    fn test_time_not_leaked_between_products() {
        let catalog = StubCatalog::default()
            .add(1, DurationUnit::Hour, true, Ok(true))
            .add(2, DurationUnit::Day, true, Ok(true));

        AvailabilityFilter::new().filter(&catalog, &[1, 2], &selection("2021-03-01 10:00", "2021-03-01 12:00", 1));

        assert_eq!(catalog.products[&1].seen.lock().unwrap()[0].start_date_time.as_deref(), Some("10:00"));
        assert!(catalog.products[&2].seen.lock().unwrap()[0].start_date_time.is_none());
    }

    #[test]
    fn test_deadline_truncates_slow_engine() {
        let catalog = StubCatalog::default()
            .add(1, DurationUnit::Day, true, Ok(true))
            .add(2, DurationUnit::Day, true, Ok(true))
            .add(3, DurationUnit::Day, true, Ok(true))
            .slow(1, Duration::from_millis(20));
        let filter = AvailabilityFilter::new().with_deadline(Duration::from_millis(5));

        let result = filter.filter(&catalog, &[1, 2, 3], &selection("2021-03-01", "2021-03-02", 1));

        assert!(result.truncated);
        assert_eq!(result.matches, vec![1]);
        assert!(catalog.products[&3].seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_idempotent() {
        let catalog = StubCatalog::default()
            .add(1, DurationUnit::Night, true, Ok(true))
            .add(2, DurationUnit::Day, true, Ok(false));
        let filter = AvailabilityFilter::new();
        let selection = selection("2021-03-01", "2021-03-04", 2);

        let first = filter.filter(&catalog, &[2, 1], &selection);
        let second = filter.filter(&catalog, &[2, 1], &selection);

        assert_eq!(first, second);
    }
}
