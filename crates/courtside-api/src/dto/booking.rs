//! Booking DTOs
//!
//! Wire times are `HH:MM` strings; they are parsed into slots before any
//! service sees them, so malformed input fails at the boundary.

use chrono::{DateTime, NaiveDate, Utc};
use courtside_core::{
    models::{Booking, BookingStatus, TimeSlot},
    traits::{BookingQuery, Pagination},
    AppError, AppResult,
};
use courtside_services::CreateBooking;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::decimal_to_f64;

/// Request body for creating a booking
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1))]
    pub court_id: i32,

    /// Omitted for walk-in bookings
    #[validate(range(min = 1))]
    pub customer_id: Option<i32>,

    pub date: NaiveDate,

    /// Slot start, `HH:MM`
    pub start_time: String,

    /// Slot end, `HH:MM`
    pub end_time: String,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,

    #[serde(default)]
    pub is_recurring: bool,

    #[validate(length(max = 100))]
    pub recurring_group: Option<String>,

    pub created_by: Option<i32>,
}

impl CreateBookingRequest {
    /// Parse the wire form into a service command
    pub fn into_command(self) -> AppResult<CreateBooking> {
        let slot = TimeSlot::parse(&self.start_time, &self.end_time)?;

        Ok(CreateBooking {
            court_id: self.court_id,
            customer_id: self.customer_id,
            date: self.date,
            slot,
            notes: self.notes,
            is_recurring: self.is_recurring,
            recurring_group: self.recurring_group,
            created_by: self.created_by,
        })
    }
}

/// Request body for moving a booking to a new slot
#[derive(Debug, Deserialize, Validate)]
pub struct RescheduleRequest {
    /// New slot start, `HH:MM`
    pub start_time: String,

    /// New slot end, `HH:MM`
    pub end_time: String,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl RescheduleRequest {
    /// Parse the new slot
    pub fn slot(&self) -> AppResult<TimeSlot> {
        TimeSlot::parse(&self.start_time, &self.end_time)
    }
}

/// Request body for cancelling a booking
#[derive(Debug, Deserialize, Validate)]
pub struct CancelBookingRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Query parameters for listing bookings
#[derive(Debug, Deserialize, Validate)]
pub struct BookingListParams {
    pub court_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub venue_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<String>,

    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i64,

    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 200))]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    50
}

impl BookingListParams {
    /// Normalize into the typed storage query
    pub fn into_query(self) -> AppResult<BookingQuery> {
        let status = match self.status.as_deref() {
            Some(s) => Some(
                BookingStatus::from_str(s)
                    .ok_or_else(|| AppError::Validation(format!("Unknown booking status: {s}")))?,
            ),
            None => None,
        };

        Ok(BookingQuery {
            court_id: self.court_id,
            customer_id: self.customer_id,
            venue_id: self.venue_id,
            date_from: self.date_from,
            date_to: self.date_to,
            status,
            pagination: Pagination::new(self.page, self.per_page),
        })
    }
}

/// Booking response DTO
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub court_id: i32,
    pub customer_id: Option<i32>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub total_amount: f64,
    pub applied_rule: Option<String>,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub recurring_group: Option<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            court_id: booking.court_id,
            customer_id: booking.customer_id,
            date: booking.date,
            start_time: booking.start_time.format("%H:%M").to_string(),
            end_time: booking.end_time.format("%H:%M").to_string(),
            status: booking.status.to_string(),
            total_amount: decimal_to_f64(booking.total_amount),
            applied_rule: booking.applied_rule,
            notes: booking.notes,
            is_recurring: booking.is_recurring,
            recurring_group: booking.recurring_group,
            checked_in_at: booking.checked_in_at,
            checked_out_at: booking.checked_out_at,
            created_by: booking.created_by,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}
