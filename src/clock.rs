//! Wall-clock source for rendering

use chrono::{DateTime, FixedOffset, Local};

/// Supplies "now" at render time
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The local system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock stopped at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
