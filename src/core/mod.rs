// Core availability exports
pub mod dates;
pub mod duration;
pub mod engine;
pub mod filter;
pub mod hooks;
pub mod query;

pub use dates::{is_valid_date, parse_date_part, split_time};
pub use duration::calculate_duration;
pub use engine::{BookableProduct, BookingError, ProductCatalog};
pub use filter::{AvailabilityFilter, AvailabilityResult};
pub use hooks::{ErrorSink, IdentityTransform, NoopErrorSink, ResultTransform, TracingErrorSink};
pub use query::build_query_args;
