//! Booking model
//!
//! The central entity of the scheduling engine. A booking reserves one court
//! for a `[start, end)` slot on a calendar date and moves through a fixed
//! lifecycle; it is never deleted, only transitioned.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::slot::TimeSlot;

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting confirmation
    #[default]
    Pending,
    /// Confirmed, slot is held
    Confirmed,
    /// Customer checked in, play underway
    InProgress,
    /// Checked out, amount charged
    Completed,
    /// Cancelled, slot released
    Cancelled,
    /// Customer never arrived, slot released
    NoShow,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::InProgress => write!(f, "in_progress"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
            BookingStatus::NoShow => write!(f, "no_show"),
        }
    }
}

impl BookingStatus {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "in_progress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "no_show" => Some(BookingStatus::NoShow),
            _ => None,
        }
    }

    /// Whether a booking in this status still occupies its time slot
    pub fn blocks_slot(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::InProgress
        )
    }

    /// Terminal statuses are immutable except for audit fields
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// The statuses that count as conflicts in availability checks
    pub fn slot_blocking() -> &'static [BookingStatus] {
        &[
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
        ]
    }

    /// Cancellation is allowed from any non-terminal status
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Check-in is only valid from a confirmed booking
    pub fn can_check_in(&self) -> bool {
        matches!(self, BookingStatus::Confirmed)
    }

    /// Check-out is only valid while play is underway
    pub fn can_check_out(&self) -> bool {
        matches!(self, BookingStatus::InProgress)
    }

    /// No-show is only reachable from a confirmed booking
    pub fn can_mark_no_show(&self) -> bool {
        matches!(self, BookingStatus::Confirmed)
    }

    /// Times (and price) may only change while the slot is still held
    pub fn can_reschedule(&self) -> bool {
        self.blocks_slot()
    }
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier (UUID)
    pub id: Uuid,

    /// Reserved court
    pub court_id: i32,

    /// Customer, if any; walk-in bookings have none
    pub customer_id: Option<i32>,

    /// Calendar date of the slot
    pub date: NaiveDate,

    /// Slot start (inclusive)
    pub start_time: NaiveTime,

    /// Slot end (exclusive)
    pub end_time: NaiveTime,

    /// Lifecycle status
    pub status: BookingStatus,

    /// Price computed at creation, recomputed on pre-completion time edits
    pub total_amount: Decimal,

    /// Display name of the pricing rule that priced this booking
    pub applied_rule: Option<String>,

    /// Free-text notes; cancellation reasons are appended here
    pub notes: Option<String>,

    /// Part of a recurring series
    pub is_recurring: bool,

    /// Opaque grouping key for recurring series
    pub recurring_group: Option<String>,

    /// When the customer checked in
    pub checked_in_at: Option<DateTime<Utc>>,

    /// When the customer checked out
    pub checked_out_at: Option<DateTime<Utc>>,

    /// Staff user who entered the booking
    pub created_by: Option<i32>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a new booking for a slot, priced and ready to persist
    pub fn new(
        court_id: i32,
        customer_id: Option<i32>,
        date: NaiveDate,
        slot: TimeSlot,
        status: BookingStatus,
        total_amount: Decimal,
        applied_rule: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            court_id,
            customer_id,
            date,
            start_time: slot.start_time(),
            end_time: slot.end_time(),
            status,
            total_amount,
            applied_rule,
            notes: None,
            is_recurring: false,
            recurring_group: None,
            checked_in_at: None,
            checked_out_at: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The booking's time slot; `None` only for corrupt rows
    pub fn slot(&self) -> Option<TimeSlot> {
        TimeSlot::new(self.start_time, self.end_time).ok()
    }
}
