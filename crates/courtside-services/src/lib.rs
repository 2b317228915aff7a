//! Business logic services for Courtside
//!
//! This crate contains the booking scheduling & pricing engine:
//!
//! - `PricingEngine` - resolves the price per hour for a court/date/slot
//!   from the venue's prioritized rule set
//! - `AvailabilityChecker` - reports overlaps against slot-blocking bookings
//! - `BookingManager` - drives the booking lifecycle with race-free slot
//!   allocation
//! - `CalendarProjector` - read-only court/booking aggregation for display
//!
//! # Architecture
//!
//! Services are stateless and composable: each owns its collaborators
//! (stores, the pool) behind `Arc`, all booking state lives in storage, and
//! every operation is instrumented with tracing.

pub mod availability;
pub mod booking_manager;
pub mod calendar;
pub mod pricing;

pub use availability::{Availability, AvailabilityChecker};
pub use booking_manager::{BookingManager, BookingSettings, CreateBooking};
pub use calendar::{CalendarData, CalendarProjector};
pub use pricing::{PriceQuote, PricingEngine};

/// Business logic constants
pub mod constants {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Fallback price per hour when a venue has no default pricing rule
    pub const DEFAULT_PRICE_PER_HOUR: Decimal = dec!(100000);

    /// Rule label reported when the fallback price applies
    pub const DEFAULT_RULE_LABEL: &str = "default";
}
