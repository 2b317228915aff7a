//! Request/response DTOs for the Courtside API

pub mod booking;
pub mod calendar;
pub mod common;
pub mod pricing;

pub use booking::{
    BookingListParams, BookingResponse, CancelBookingRequest, CreateBookingRequest,
    RescheduleRequest,
};
pub use calendar::{CalendarParams, CalendarResponse, CourtResponse};
pub use common::{ApiResponse, PaginationParams};
pub use pricing::{AvailabilityParams, AvailabilityResponse, QuoteParams, QuoteResponse};
