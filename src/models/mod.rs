// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    DateSelection, DurationUnit, FacetType, FacetValue, PostId, QueryArgs, SpanUnit, StayWindow,
    AVAILABILITY_FACET,
};
pub use requests::FilterRequest;
pub use responses::{ErrorResponse, FilterResponse, HealthResponse};
