//! Time source for step and workflow timestamps.
//!
//! Every timestamp the engine writes goes through a [`Clock`], so tests
//! can pin or step time instead of sleeping between calls.

use std::cell::Cell;

use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

pub trait Clock {
    fn now(&self) -> OffsetDateTime;

    /// Current time as an RFC 3339 string.
    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| "unknown".to_string())
}

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Advances by a fixed interval after every reading.
#[derive(Debug)]
pub struct SteppingClock {
    next: Cell<OffsetDateTime>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: OffsetDateTime, step: Duration) -> Self {
        SteppingClock {
            next: Cell::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> OffsetDateTime {
        let current = self.next.get();
        self.next.set(current + self.step);
        current
    }
}
