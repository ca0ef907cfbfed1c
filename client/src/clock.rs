use lucky_ponds_core::UnixTimestamp;

use chrono::Utc;
use tokio::time::Sleep;

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Injectable time source driving the polling loop.
pub trait Clock: Send + Sync {
    /// Current time in seconds since the Unix epoch.
    fn now(&self) -> UnixTimestamp;
    /// Sleep for the given number of seconds.
    fn sleep(&self, seconds: u64) -> Sleep;
}

/// System clock, wrapping chrono.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimestamp {
        Utc::now().timestamp()
    }

    fn sleep(&self, seconds: u64) -> Sleep {
        tokio::time::sleep(Duration::from_secs(seconds))
    }
}

/// Mock clock for testing.
///
/// `sleep` advances the stored time by the requested amount but waits only
/// a millisecond of real time, so a polling loop driven by it runs through
/// simulated time quickly while still yielding to the executor.
#[derive(Debug)]
pub struct MockClock {
    current_time: AtomicI64,
}

impl MockClock {
    pub fn new(start_time: UnixTimestamp) -> Self {
        Self {
            current_time: AtomicI64::new(start_time),
        }
    }

    pub fn advance(&self, seconds: UnixTimestamp) {
        self.current_time.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now(&self) -> UnixTimestamp {
        self.current_time.load(Ordering::SeqCst)
    }

    fn sleep(&self, seconds: u64) -> Sleep {
        self.advance(seconds as UnixTimestamp);
        tokio::time::sleep(Duration::from_millis(1))
    }
}
