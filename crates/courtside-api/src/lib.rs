//! Courtside HTTP API Layer
//!
//! actix-web handlers and DTOs wrapping the booking engine. The services are
//! generic over their stores; this crate pins them to the PostgreSQL
//! implementations the server runs with.

pub mod dto;
pub mod handlers;

use courtside_db::{PgBookingStore, PgCourtStore, PgCustomerCounters, PgPricingRuleStore};
use courtside_services::{
    AvailabilityChecker, BookingManager, CalendarProjector, PricingEngine,
};

/// Pricing engine over the PostgreSQL stores
pub type AppPricingEngine = PricingEngine<PgCourtStore, PgPricingRuleStore>;

/// Availability checker over the PostgreSQL stores
pub type AppAvailabilityChecker = AvailabilityChecker<PgBookingStore>;

/// Booking manager over the PostgreSQL stores
pub type AppBookingManager =
    BookingManager<PgCourtStore, PgPricingRuleStore, PgBookingStore, PgCustomerCounters>;

/// Calendar projector over the PostgreSQL stores
pub type AppCalendarProjector = CalendarProjector<PgCourtStore, PgBookingStore>;
