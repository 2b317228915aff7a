//! Pricing rule model
//!
//! A rule prices bookings at a per-hour amount, optionally restricted to one
//! day of the week and/or a time window. Restricted rules only apply when the
//! booking slot is fully contained in the window; overlap is not enough.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::slot::{minutes_since_midnight, TimeSlot};

/// Day-of-week label for rule matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayOfWeek::Monday => write!(f, "MONDAY"),
            DayOfWeek::Tuesday => write!(f, "TUESDAY"),
            DayOfWeek::Wednesday => write!(f, "WEDNESDAY"),
            DayOfWeek::Thursday => write!(f, "THURSDAY"),
            DayOfWeek::Friday => write!(f, "FRIDAY"),
            DayOfWeek::Saturday => write!(f, "SATURDAY"),
            DayOfWeek::Sunday => write!(f, "SUNDAY"),
        }
    }
}

impl DayOfWeek {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "MONDAY" => Some(DayOfWeek::Monday),
            "TUESDAY" => Some(DayOfWeek::Tuesday),
            "WEDNESDAY" => Some(DayOfWeek::Wednesday),
            "THURSDAY" => Some(DayOfWeek::Thursday),
            "FRIDAY" => Some(DayOfWeek::Friday),
            "SATURDAY" => Some(DayOfWeek::Saturday),
            "SUNDAY" => Some(DayOfWeek::Sunday),
            _ => None,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Pricing rule entity
///
/// `start_time` and `end_time` are either both set or both unset. A rule with
/// neither a day nor a window is a venue-wide default candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRule {
    /// Unique identifier
    pub id: i32,

    /// Owning venue
    pub venue_id: i32,

    /// Display name, reported back on priced bookings
    pub name: String,

    /// Restrict to one day of the week; unset = any day
    pub day_of_week: Option<DayOfWeek>,

    /// Window start; unset = all day
    pub start_time: Option<NaiveTime>,

    /// Window end
    pub end_time: Option<NaiveTime>,

    /// Price per hour
    pub price_per_hour: Decimal,

    /// Higher priority wins among matching rules
    pub priority: i32,

    /// Inactive rules are never considered
    pub is_active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl PricingRule {
    /// A default candidate has neither day nor time restriction
    pub fn is_default(&self) -> bool {
        self.day_of_week.is_none() && self.start_time.is_none()
    }

    /// Whether this rule prices a booking on `day` over `slot`.
    ///
    /// Day must match when restricted; a time window must fully contain the
    /// slot, not merely overlap it.
    pub fn applies_to(&self, day: DayOfWeek, slot: &TimeSlot) -> bool {
        if let Some(rule_day) = self.day_of_week {
            if rule_day != day {
                return false;
            }
        }

        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            let window_start = minutes_since_midnight(start);
            let window_end = minutes_since_midnight(end);
            return slot.start_minutes() >= window_start && slot.end_minutes() <= window_end;
        }

        true
    }
}
