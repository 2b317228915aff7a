//! Repository implementations for Courtside

pub mod booking_repo;
pub mod court_repo;
pub mod customer_repo;
pub mod pricing_rule_repo;

pub use booking_repo::{status_strings, BookingRow, PgBookingStore, BOOKING_COLUMNS};
pub use court_repo::PgCourtStore;
pub use customer_repo::PgCustomerCounters;
pub use pricing_rule_repo::PgPricingRuleStore;
