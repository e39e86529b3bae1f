//! Construction parameters for `ChainedHashMap`.

use crate::error::ConfigError;

pub const DEFAULT_BUCKET_COUNT: usize = 5;
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;
pub const DEFAULT_GROW_FACTOR: usize = 2;

/// Table sizing knobs.
///
/// - `bucket_count`: initial table length. Smaller tables collide and
///   resize earlier.
/// - `load_factor`: a resize runs before an insert when
///   `bucket_count * load_factor < len`.
/// - `grow_factor`: each resize multiplies the table length by this.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub bucket_count: usize,
    pub load_factor: f64,
    pub grow_factor: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            load_factor: DEFAULT_LOAD_FACTOR,
            grow_factor: DEFAULT_GROW_FACTOR,
        }
    }
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn with_grow_factor(mut self, grow_factor: usize) -> Self {
        self.grow_factor = grow_factor;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket_count == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        if self.grow_factor < 2 {
            return Err(ConfigError::InvalidGrowFactor(self.grow_factor));
        }
        Ok(())
    }

    /// Whether a table of `table_len` slots holding `len` entries must grow.
    #[inline]
    pub(crate) fn needs_grow(&self, table_len: usize, len: usize) -> bool {
        (table_len as f64) * self.load_factor < len as f64
    }
}
