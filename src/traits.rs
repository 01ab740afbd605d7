//! Abstraction over wall-clock time so schedule classification, position
//! caching and the date line can be tested deterministically.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};

// ==================== Clock Trait ====================

/// Trait for abstracting time access.
pub trait Clock: Send + Sync {
    /// Get the current time in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Get the current wall-clock time in the user's timezone.
    fn now_local(&self) -> NaiveDateTime;
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Mock clock for testing with controllable time.
///
/// Local time is derived from a fixed UTC offset (UTC unless set), so results
/// do not depend on the machine running the tests.
#[derive(Debug, Clone)]
pub struct MockClock {
    utc_time: Arc<Mutex<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl MockClock {
    /// Create a new mock clock set to the given UTC time.
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            utc_time: Arc::new(Mutex::new(time)),
            offset: FixedOffset::east_opt(0).expect("zero offset is valid"),
        }
    }

    /// Create a mock clock whose local time is `offset` ahead of UTC.
    pub fn with_offset(time: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            utc_time: Arc::new(Mutex::new(time)),
            offset,
        }
    }

    /// Set the mock clock to a new time.
    pub fn set_time(&self, time: DateTime<Utc>) {
        *self.utc_time.lock().unwrap() = time;
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut time = self.utc_time.lock().unwrap();
        *time += duration;
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.utc_time.lock().unwrap()
    }

    fn now_local(&self) -> NaiveDateTime {
        self.now_utc().with_timezone(&self.offset).naive_local()
    }
}
