//! Business calendar: resolves "today" in one fixed zone.

use super::error::FamilyCostError;
use crate::ports::clock_port::ClockPort;
use chrono::{FixedOffset, NaiveDate, Offset, Utc};

/// Default business zone, UTC+06:00.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 6 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    offset: FixedOffset,
}

impl BusinessCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Parse an offset written as `+06:00`, `-05:30`, `+0600` or `Z`.
    pub fn parse_offset(value: &str) -> Result<FixedOffset, FamilyCostError> {
        let value = value.trim();
        let invalid = || FamilyCostError::InvalidDate {
            value: value.to_string(),
        };
        if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
            return FixedOffset::east_opt(0).ok_or_else(invalid);
        }

        let (sign, rest) = match value.split_at_checked(1) {
            Some(("+", rest)) => (1, rest),
            Some(("-", rest)) => (-1, rest),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None if rest.len() == 4 => rest.split_at(2),
            None => return Err(invalid()),
        };
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if hours > 14 || minutes > 59 {
            return Err(invalid());
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn today(&self, clock: &dyn ClockPort) -> NaiveDate {
        clock.now().with_timezone(&self.offset).date_naive()
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix()),
        }
    }
}
