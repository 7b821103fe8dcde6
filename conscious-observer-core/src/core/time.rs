//! Timestamp type threaded through the engine without reading wall-clock time.
//!
//! The core never calls `Instant::now()` or `SystemTime::now()` internally;
//! hosts supply timestamps at phase boundaries so the engine stays
//! deterministic and replayable under test.

use serde::Deserialize;
use serde::Serialize;

/// A monotonic instant supplied by the host, expressed in milliseconds.
///
/// # Invariants
/// - Always non-negative; construction does not enforce this, but hosts are
///   expected to supply values from a monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonotonicMillis(pub u64);

impl MonotonicMillis {
    /// Wraps a raw millisecond value.
    #[must_use]
    pub const fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the elapsed duration since `earlier`, saturating at zero.
    #[must_use]
    pub const fn saturating_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
