//! Calendar projector
//!
//! Read-only aggregation for calendar screens: a venue's active courts in
//! display order plus their bookings over a date window. Cancelled and
//! no-show bookings are not projected.

use courtside_core::{
    models::{Booking, BookingStatus, Court},
    traits::{BookingStore, CourtStore},
    AppError, AppResult,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Statuses shown on the calendar
const PROJECTED_STATUSES: [BookingStatus; 4] = [
    BookingStatus::Pending,
    BookingStatus::Confirmed,
    BookingStatus::InProgress,
    BookingStatus::Completed,
];

/// Calendar payload: courts in display order, bookings by date then start
#[derive(Debug, Clone, Serialize)]
pub struct CalendarData {
    pub courts: Vec<Court>,
    pub bookings: Vec<Booking>,
}

/// Calendar projector
pub struct CalendarProjector<C: CourtStore, B: BookingStore> {
    courts: Arc<C>,
    bookings: Arc<B>,
}

impl<C: CourtStore, B: BookingStore> CalendarProjector<C, B> {
    /// Create a new calendar projector
    pub fn new(courts: Arc<C>, bookings: Arc<B>) -> Self {
        Self { courts, bookings }
    }

    /// Project a venue's calendar over `[from, to]`
    #[instrument(skip(self))]
    pub async fn project(
        &self,
        venue_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<CalendarData> {
        if to < from {
            return Err(AppError::Validation(format!(
                "End date {} is before start date {}",
                to, from
            )));
        }

        let courts = self.courts.list_active_by_venue(venue_id).await?;

        if courts.is_empty() {
            debug!("Venue {} has no active courts", venue_id);
            return Ok(CalendarData {
                courts,
                bookings: vec![],
            });
        }

        let court_ids: Vec<i32> = courts.iter().map(|c| c.id).collect();
        let bookings = self
            .bookings
            .list_in_range(&court_ids, from, to, &PROJECTED_STATUSES)
            .await?;

        debug!(
            "Calendar for venue {}: {} courts, {} bookings",
            venue_id,
            courts.len(),
            bookings.len()
        );

        Ok(CalendarData { courts, bookings })
    }
}
