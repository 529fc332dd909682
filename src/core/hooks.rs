use crate::core::engine::BookingError;
use crate::models::PostId;

/// Final transform applied to every match set before it is returned
///
/// Collaborators use this to further filter the ids, or to map matched
/// products onto the posts that own them.
pub trait ResultTransform: Send + Sync {
    fn transform(&self, matches: Vec<PostId>) -> Vec<PostId>;
}

/// Returns the match set untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl ResultTransform for IdentityTransform {
    fn transform(&self, matches: Vec<PostId>) -> Vec<PostId> {
        matches
    }
}

impl<F> ResultTransform for F
where
    F: Fn(Vec<PostId>) -> Vec<PostId> + Send + Sync,
{
    fn transform(&self, matches: Vec<PostId>) -> Vec<PostId> {
        self(matches)
    }
}

/// Receives booking engine errors that the filter treats as "unavailable"
pub trait ErrorSink: Send + Sync {
    fn report(&self, post_id: PostId, error: &BookingError);
}

/// Logs engine errors through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, post_id: PostId, error: &BookingError) {
        match error {
            BookingError::Engine(_) => tracing::warn!("Booking engine failed for post {}: {}", post_id, error),
            _ => tracing::debug!("Post {} not bookable: {}", post_id, error),
        }
    }
}

/// Discards engine errors
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopErrorSink;

impl ErrorSink for NoopErrorSink {
    fn report(&self, _post_id: PostId, _error: &BookingError) {}
}

impl<F> ErrorSink for F
where
    F: Fn(PostId, &BookingError) + Send + Sync,
{
    fn report(&self, post_id: PostId, error: &BookingError) {
        self(post_id, error)
    }
}
