//! Court and venue models
//!
//! Courts and venues are owned by venue management; the booking engine only
//! reads them to validate requests and project calendars.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::slot::TimeSlot;

/// Operational status of a court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourtStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

impl fmt::Display for CourtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourtStatus::Active => write!(f, "active"),
            CourtStatus::Maintenance => write!(f, "maintenance"),
            CourtStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl CourtStatus {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(CourtStatus::Active),
            "maintenance" => Some(CourtStatus::Maintenance),
            "inactive" => Some(CourtStatus::Inactive),
            _ => None,
        }
    }

    /// Only active courts accept new bookings
    pub fn is_bookable(&self) -> bool {
        matches!(self, CourtStatus::Active)
    }
}

/// Court entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    /// Unique identifier
    pub id: i32,

    /// Owning venue
    pub venue_id: i32,

    /// Display name
    pub name: String,

    /// Operational status
    pub status: CourtStatus,

    /// Manual ordering for calendar display
    pub sort_order: i32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Venue entity
///
/// Carries the daily open/close bounds every booking on its courts must
/// respect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    /// Unique identifier
    pub id: i32,

    /// Display name
    pub name: String,

    /// Daily opening time
    pub open_time: NaiveTime,

    /// Daily closing time
    pub close_time: NaiveTime,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    /// Whether a slot falls within the venue's open hours.
    ///
    /// Compares hour components only; minutes are ignored. A booking ending
    /// at 23:15 passes against a 23:00 close.
    pub fn covers(&self, slot: &TimeSlot) -> bool {
        slot.start_hour() >= self.open_time.hour() as i32
            && slot.end_hour() <= self.close_time.hour() as i32
    }
}

/// A court joined with its owning venue, as returned by court lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtWithVenue {
    pub court: Court,
    pub venue: Venue,
}
