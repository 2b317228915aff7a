//! Availability checker
//!
//! Read path for "is this slot free?". Only slot-blocking bookings count as
//! conflicts; completed, cancelled, and no-show bookings never do. The
//! race-free check used for writes runs inside the lifecycle manager's
//! transaction with the same overlap predicate.

use courtside_core::{
    models::{Booking, BookingStatus, TimeSlot},
    traits::BookingStore,
    AppResult,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Result of an availability check
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    /// True when no conflicting booking holds the slot
    pub available: bool,

    /// The bookings that overlap the requested slot
    pub conflicts: Vec<Booking>,
}

/// Availability checker
pub struct AvailabilityChecker<B: BookingStore> {
    bookings: Arc<B>,
}

impl<B: BookingStore> AvailabilityChecker<B> {
    /// Create a new availability checker
    pub fn new(bookings: Arc<B>) -> Self {
        Self { bookings }
    }

    /// Check a slot on a court/date, optionally excluding one booking so an
    /// edit does not conflict with itself
    #[instrument(skip(self))]
    pub async fn check(
        &self,
        court_id: i32,
        date: NaiveDate,
        slot: &TimeSlot,
        exclude: Option<Uuid>,
    ) -> AppResult<Availability> {
        let held = self
            .bookings
            .list_for_slot(court_id, date, BookingStatus::slot_blocking(), exclude)
            .await?;

        let conflicts: Vec<Booking> = held
            .into_iter()
            .filter(|b| b.slot().is_some_and(|s| s.overlaps(slot)))
            .collect();

        debug!(
            "Availability for court {} on {} {}: {} conflict(s)",
            court_id,
            date,
            slot,
            conflicts.len()
        );

        Ok(Availability {
            available: conflicts.is_empty(),
            conflicts,
        })
    }
}
