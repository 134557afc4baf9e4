//! Time and simulated network latency, behind an injectable trait.
//!
//! Every auth/CRUD action contains one artificial suspension modelling a
//! network round-trip. Routing both `now` and `sleep` through [`Clock`]
//! lets tests substitute a [`ManualClock`] that advances virtually and
//! records requested delays instead of waiting on real time.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

/// Simulated round-trip for login and signup.
pub const AUTH_LATENCY: Duration = Duration::from_millis(800);
/// Simulated round-trip for ticket create/update/delete.
pub const MUTATION_LATENCY: Duration = Duration::from_millis(500);

/// Wall-clock time plus the store's artificial latency.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}

/// The real thing: wall-clock time and blocking sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug)]
struct ManualInner {
    now: DateTime<Utc>,
    slept: Vec<Duration>,
}

/// Test clock: starts at a fixed instant, never blocks, and records every
/// requested delay. Sleeping advances virtual time by the slept amount, so
/// timestamps taken after a "round-trip" still move forward.
///
/// Clones share the same underlying clock, which is how tests keep a handle
/// on a clock after moving it into a store.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualClock {
    /// A manual clock starting at `start`.
    #[must_use]
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualInner {
                now: start,
                slept: Vec::new(),
            })),
        }
    }

    /// Advance virtual time without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        let mut inner = self.lock();
        inner.now += chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
    }

    /// All delays requested so far, in order.
    #[must_use]
    pub fn slept(&self) -> Vec<Duration> {
        self.lock().slept.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        // An arbitrary fixed instant; tests that care pass their own.
        let start = Utc
            .with_ymd_and_hms(2025, 11, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self::starting_at(start)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.lock().now
    }

    fn sleep(&self, duration: Duration) {
        let mut inner = self.lock();
        inner.slept.push(duration);
        inner.now += chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::zero());
    }
}
