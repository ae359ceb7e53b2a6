use std::collections::TryReserveError;
use thiserror::Error;

/// Failures surfaced by map construction and insertion.
///
/// A missing key is not an error: `get` and `delete` report it as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("capacity must be at least one bucket")]
    ZeroCapacity,

    #[error("failed to allocate {capacity} buckets: {source}")]
    BucketAllocation {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("failed to allocate entry: {0}")]
    EntryAllocation(#[source] TryReserveError),
}
