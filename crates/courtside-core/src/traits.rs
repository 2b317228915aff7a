//! Storage contracts consumed by the booking engine
//!
//! The engine owns bookings; courts, venues, pricing rules, and customer
//! counters belong to other parts of the system and are reached through the
//! narrow read/side-effect traits below.

use crate::error::AppError;
use crate::models::{Booking, BookingStatus, Court, CourtWithVenue, PricingRule};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Court lookup, read-only
#[async_trait]
pub trait CourtStore: Send + Sync {
    /// Find a court together with its owning venue
    async fn find_with_venue(&self, id: i32) -> Result<Option<CourtWithVenue>, AppError>;

    /// Active courts of a venue, ordered by manual sort order
    async fn list_active_by_venue(&self, venue_id: i32) -> Result<Vec<Court>, AppError>;
}

/// Pricing rule lookup, read-only
#[async_trait]
pub trait PricingRuleStore: Send + Sync {
    /// Active rules of a venue, ordered by priority descending (stable)
    async fn list_active_by_venue(&self, venue_id: i32) -> Result<Vec<PricingRule>, AppError>;
}

/// Booking reads
///
/// Writes that must be atomic with an availability check run inside the
/// lifecycle manager's transaction and are not part of this contract.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Find a booking by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError>;

    /// Bookings on one court/date in the given statuses, optionally
    /// excluding one booking (used during edits)
    async fn list_for_slot(
        &self,
        court_id: i32,
        date: NaiveDate,
        statuses: &[BookingStatus],
        exclude: Option<Uuid>,
    ) -> Result<Vec<Booking>, AppError>;

    /// Bookings across several courts in a date window, ordered by date then
    /// start time
    async fn list_in_range(
        &self,
        court_ids: &[i32],
        from: NaiveDate,
        to: NaiveDate,
        statuses: &[BookingStatus],
    ) -> Result<Vec<Booking>, AppError>;

    /// Filtered, paginated search; returns the page and the total count
    async fn search(&self, query: &BookingQuery) -> Result<(Vec<Booking>, i64), AppError>;
}

/// Best-effort customer aggregate counters
///
/// Failures are logged and swallowed by callers; they never fail the booking
/// operation that triggered them.
#[async_trait]
pub trait CustomerCounters: Send + Sync {
    /// `total_bookings += 1`
    async fn increment_booking_count(&self, customer_id: i32) -> Result<(), AppError>;

    /// `total_spent += amount`
    async fn increment_total_spent(&self, customer_id: i32, amount: Decimal)
        -> Result<(), AppError>;
}

/// Explicit filter set for booking searches
///
/// Every supported filter is a typed field; there is no pass-through of
/// ad-hoc query objects to the storage layer.
#[derive(Debug, Clone, Default)]
pub struct BookingQuery {
    pub court_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub venue_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub pagination: Pagination,
}

/// Pagination parameters
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 200),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offsets() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 10);

        let p = Pagination::new(4, 25);
        assert_eq!(p.offset(), 75);
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(0, 10);
        assert_eq!(p.page, 1);

        let p = Pagination::new(1, 10_000);
        assert_eq!(p.per_page, 200);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(101, 2, 10);
        assert_eq!(meta.total_pages, 11);

        let meta = PaginationMeta::new(100, 1, 10);
        assert_eq!(meta.total_pages, 10);
    }

    #[test]
    fn test_booking_query_defaults() {
        let q = BookingQuery::default();
        assert!(q.court_id.is_none());
        assert!(q.status.is_none());
        assert_eq!(q.pagination.page, 1);
    }
}
