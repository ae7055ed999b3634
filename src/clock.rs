//! Time source abstraction.
//!
//! All expiry and lockout math is relative to a [`Clock`], so tests can
//! simulate the passage of time deterministically instead of sleeping.

use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Supplies wall-clock time to the registries and the service.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// The real clock, backed by `SystemTime::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
///
/// Share one instance (via `Arc`) between the components under test and the
/// test itself, then `advance` it past TTLs and lockout windows without
/// real delays.
pub struct ManualClock {
    current: Mutex<SystemTime>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap();
        *current += by;
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: SystemTime) {
        *self.current.lock().unwrap() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(SystemTime::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.current.lock().unwrap()
    }
}
