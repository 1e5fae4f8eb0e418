//! Wall-clock adapter for the clock port.

use crate::ports::clock_port::ClockPort;
use chrono::{DateTime, Utc};

pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
