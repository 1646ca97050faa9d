//! Time source abstraction for testability
//!
//! Expiry is a read-time predicate, so every read path asks a [`Clock`]
//! for the current instant instead of calling `Utc::now()` directly.
//! Uses mockall for automatic mock generation in test builds.

use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

/// Trait abstracting the wall clock for dependency injection.
///
/// # Example (testing)
/// ```ignore
/// use banstore::clock::MockClock;
///
/// let mut clock = MockClock::new();
/// clock.expect_now().returning(chrono::Utc::now);
/// ```
#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Real clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
