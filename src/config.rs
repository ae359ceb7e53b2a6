//! Construction parameters for `ConcurrentMap`.

use crate::error::MapError;
use core::num::NonZeroUsize;

/// Bucket count used by `MapConfig::default()`.
pub const DEFAULT_CAPACITY: usize = 16;

/// Map construction settings. The bucket count is fixed for the lifetime
/// of the map; there is no rehashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    pub capacity: usize,
}

impl MapConfig {
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Check the settings, returning the bucket count.
    pub fn validate(&self) -> Result<NonZeroUsize, MapError> {
        NonZeroUsize::new(self.capacity).ok_or(MapError::ZeroCapacity)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
