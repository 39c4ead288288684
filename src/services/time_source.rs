//! Clock abstraction for the picker.
//!
//! Double-click detection compares click timestamps. Production code reads
//! the monotonic clock; tests inject [`TestTimeSource`] and move time forward
//! explicitly so that "two clicks 200 ms apart" needs no real waiting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub trait TimeSource: Send + Sync + std::fmt::Debug {
    /// Current instant for measuring elapsed time.
    fn now(&self) -> Instant;

    /// Time elapsed since an earlier instant, zero if `earlier` is in the future.
    fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

pub type SharedTimeSource = Arc<dyn TimeSource>;

/// Monotonic system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeSource;

impl RealTimeSource {
    pub fn shared() -> SharedTimeSource {
        Arc::new(Self)
    }
}

impl TimeSource for RealTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually driven clock.
///
/// `now()` is the creation instant plus whatever was passed to
/// [`advance`](Self::advance) so far.
#[derive(Debug)]
pub struct TestTimeSource {
    logical_nanos: AtomicU64,
    base_instant: Instant,
}

impl Default for TestTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTimeSource {
    pub fn new() -> Self {
        Self {
            logical_nanos: AtomicU64::new(0),
            base_instant: Instant::now(),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn advance(&self, duration: Duration) {
        self.logical_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl TimeSource for TestTimeSource {
    fn now(&self) -> Instant {
        self.base_instant + Duration::from_nanos(self.logical_nanos.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_time_source_is_monotonic() {
        let ts = RealTimeSource;
        let t1 = ts.now();
        let t2 = ts.now();
        assert!(t2 >= t1);
    }

    #[test]
    fn test_time_source_only_moves_when_advanced() {
        let ts = TestTimeSource::new();
        let start = ts.now();
        assert_eq!(ts.elapsed_since(start), Duration::ZERO);

        ts.advance(Duration::from_millis(250));
        ts.advance(Duration::from_millis(250));

        assert_eq!(ts.elapsed_since(start), Duration::from_millis(500));
    }

    #[test]
    fn elapsed_since_future_instant_is_zero() {
        let ts = TestTimeSource::new();
        let later = ts.now() + Duration::from_secs(1);
        assert_eq!(ts.elapsed_since(later), Duration::ZERO);
    }

    #[test]
    fn shared_clock_is_visible_through_trait_object() {
        let concrete = TestTimeSource::shared();
        let shared: SharedTimeSource = concrete.clone();
        let start = shared.now();
        concrete.advance(Duration::from_millis(42));
        assert_eq!(shared.elapsed_since(start), Duration::from_millis(42));
    }
}
