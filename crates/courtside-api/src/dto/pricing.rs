//! Pricing and availability DTOs

use chrono::NaiveDate;
use courtside_core::{models::TimeSlot, AppResult};
use courtside_services::{Availability, PriceQuote};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::booking::BookingResponse;
use super::common::decimal_to_f64;

/// Query parameters for a price quote
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteParams {
    #[validate(range(min = 1))]
    pub court_id: i32,
    pub date: NaiveDate,
    /// Slot start, `HH:MM`
    pub start_time: String,
    /// Slot end, `HH:MM`
    pub end_time: String,
}

impl QuoteParams {
    pub fn slot(&self) -> AppResult<TimeSlot> {
        TimeSlot::parse(&self.start_time, &self.end_time)
    }
}

/// Price quote response DTO
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub price_per_hour: f64,
    pub duration_hours: f64,
    pub total: f64,
    pub applied_rule: String,
}

impl From<PriceQuote> for QuoteResponse {
    fn from(quote: PriceQuote) -> Self {
        Self {
            price_per_hour: decimal_to_f64(quote.price_per_hour),
            duration_hours: decimal_to_f64(quote.duration_hours),
            total: decimal_to_f64(quote.total),
            applied_rule: quote.applied_rule,
        }
    }
}

/// Query parameters for an availability check
#[derive(Debug, Deserialize, Validate)]
pub struct AvailabilityParams {
    #[validate(range(min = 1))]
    pub court_id: i32,
    pub date: NaiveDate,
    /// Slot start, `HH:MM`
    pub start_time: String,
    /// Slot end, `HH:MM`
    pub end_time: String,
    /// Booking to ignore, so an edit does not conflict with itself
    pub exclude_booking_id: Option<Uuid>,
}

impl AvailabilityParams {
    pub fn slot(&self) -> AppResult<TimeSlot> {
        TimeSlot::parse(&self.start_time, &self.end_time)
    }
}

/// Availability response DTO
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub conflicts: Vec<BookingResponse>,
}

impl From<Availability> for AvailabilityResponse {
    fn from(availability: Availability) -> Self {
        Self {
            available: availability.available,
            conflicts: availability
                .conflicts
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}
