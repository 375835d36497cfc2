//! Clock port for obtaining the current time and waiting between retries.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Provides the current time and blocking waits.
///
/// Abstracting time lets retry loops run instantly under test and makes
/// rename-aside timestamps reproducible during cassette playback.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}
