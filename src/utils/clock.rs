//! Time source for every "strictly before departure" style check.
//!
//! Services hold an `Arc<dyn Clock>` so tests can pin and move time.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type SharedClock = Arc<dyn Clock>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests and replay tooling
#[derive(Debug)]
pub struct ManualClock {
    time: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    pub fn set(&self, time: DateTime<Utc>) {
        let mut guard = self.time.lock().unwrap_or_else(|p| p.into_inner());
        *guard = time;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.time.lock().unwrap_or_else(|p| p.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.time.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_moves_only_when_told() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::minutes(90));
        assert_eq!(clock.now(), start + Duration::minutes(90));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
