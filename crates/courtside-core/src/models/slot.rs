//! Time-of-day slot model
//!
//! A slot is a half-open `[start, end)` range measured in minutes since
//! midnight on a single calendar date. All overlap and duration arithmetic
//! happens on the minute values.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AppError;

/// Convert a wall-clock time to minutes since midnight
#[inline]
pub fn minutes_since_midnight(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Parse a `HH:MM` string into a wall-clock time
pub fn parse_hhmm(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::InvalidTime(value.to_string()))
}

/// A half-open `[start, end)` time-of-day range
///
/// Construction rejects zero-length and inverted ranges, so every value of
/// this type has a strictly positive duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    start: i32,
    end: i32,
}

impl TimeSlot {
    /// Build a slot from wall-clock times
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, AppError> {
        let start_min = minutes_since_midnight(start);
        let end_min = minutes_since_midnight(end);

        if end_min <= start_min {
            return Err(AppError::InvalidTimeRange {
                start: format_hhmm(start_min),
                end: format_hhmm(end_min),
            });
        }

        Ok(Self {
            start: start_min,
            end: end_min,
        })
    }

    /// Build a slot from `HH:MM` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, AppError> {
        Self::new(parse_hhmm(start)?, parse_hhmm(end)?)
    }

    /// Overlap test for half-open ranges: `[a0,a1)` and `[b0,b1)` overlap
    /// iff `a0 < b1 && a1 > b0`. Back-to-back slots do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether `other` falls entirely within this slot
    #[inline]
    pub fn contains(&self, other: &TimeSlot) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    #[inline]
    pub fn start_minutes(&self) -> i32 {
        self.start
    }

    #[inline]
    pub fn end_minutes(&self) -> i32 {
        self.end
    }

    /// Hour component of the start time (minutes truncated)
    #[inline]
    pub fn start_hour(&self) -> i32 {
        self.start / 60
    }

    /// Hour component of the end time (minutes truncated)
    #[inline]
    pub fn end_hour(&self) -> i32 {
        self.end / 60
    }

    #[inline]
    pub fn duration_minutes(&self) -> i32 {
        self.end - self.start
    }

    /// Duration in hours, fractional (90 minutes = 1.5)
    #[inline]
    pub fn duration_hours(&self) -> Decimal {
        Decimal::from(self.duration_minutes()) / Decimal::from(60)
    }

    pub fn start_time(&self) -> NaiveTime {
        time_from_minutes(self.start)
    }

    pub fn end_time(&self) -> NaiveTime {
        time_from_minutes(self.end)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

fn format_hhmm(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn time_from_minutes(minutes: i32) -> NaiveTime {
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0).unwrap_or_default()
}
