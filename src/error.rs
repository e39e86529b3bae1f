use thiserror::Error;

/// Protocol errors reported by [`Cursor`](crate::Cursor).
///
/// Neither error changes the map: size and chains are as they were before
/// the failing call.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum IterError {
    /// `next` was called with no entries left to yield.
    #[error("iteration exhausted: no further entries")]
    Exhausted,

    /// `remove` was called before any `next`, or twice for the same `next`.
    #[error("invalid cursor state: no yielded entry is pending removal")]
    NothingToRemove,
}

/// Rejected [`MapConfig`](crate::MapConfig) values.
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum ConfigError {
    #[error("bucket count must be at least 1")]
    ZeroBuckets,

    #[error("load factor must be finite and positive, got {0}")]
    InvalidLoadFactor(f64),

    #[error("grow factor must be at least 2, got {0}")]
    InvalidGrowFactor(usize),
}
