//! Unified error handling for Courtside
//!
//! All failures surface as `AppError`, with automatic HTTP response mapping
//! for the actix-web layer. Slot conflicts carry the overlapping bookings so
//! callers can show who holds the slot.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::models::Booking;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Storage Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    // ==================== Lookup Errors ====================
    #[error("Court not found: {0}")]
    CourtNotFound(i32),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ==================== State Errors ====================
    #[error("Court {court_id} is not available for booking (status: {status})")]
    CourtUnavailable { court_id: i32, status: String },

    #[error("Requested time is outside venue hours ({open}-{close})")]
    OutsideVenueHours { open: String, close: String },

    #[error("Cannot {action} a booking in status {current}")]
    InvalidTransition { action: String, current: String },

    // ==================== Input Errors ====================
    #[error("Invalid time: {0} (expected HH:MM)")]
    InvalidTime(String),

    #[error("End time must be after start time ({start}-{end})")]
    InvalidTimeRange { start: String, end: String },

    #[error("Validation error: {0}")]
    Validation(String),

    // ==================== Scheduling Errors ====================
    #[error("Time slot conflicts with {} existing booking(s)", .conflicts.len())]
    SlotConflict { conflicts: Vec<Booking> },

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::InvalidTime(_)
            | AppError::InvalidTimeRange { .. }
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::CourtNotFound(_) | AppError::BookingNotFound(_) | AppError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            AppError::SlotConflict { .. } => StatusCode::CONFLICT,

            // 422 Unprocessable Entity
            AppError::CourtUnavailable { .. }
            | AppError::OutsideVenueHours { .. }
            | AppError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Transaction(_) => "transaction_error",
            AppError::CourtNotFound(_) => "court_not_found",
            AppError::BookingNotFound(_) => "booking_not_found",
            AppError::NotFound(_) => "not_found",
            AppError::CourtUnavailable { .. } => "court_unavailable",
            AppError::OutsideVenueHours { .. } => "outside_venue_hours",
            AppError::InvalidTransition { .. } => "invalid_transition",
            AppError::InvalidTime(_) => "invalid_time",
            AppError::InvalidTimeRange { .. } => "invalid_time_range",
            AppError::Validation(_) => "validation_error",
            AppError::SlotConflict { .. } => "slot_conflict",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }

    /// Shorthand for an invalid-transition error
    pub fn invalid_transition(
        action: impl Into<String>,
        current: impl std::fmt::Display,
    ) -> Self {
        AppError::InvalidTransition {
            action: action.into(),
            current: current.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let body = match self {
            AppError::SlotConflict { conflicts } => json!({
                "error": self.error_code(),
                "message": self.to_string(),
                "status": status.as_u16(),
                "conflicts": conflicts,
            }),
            _ => json!({
                "error": self.error_code(),
                "message": self.to_string(),
                "status": status.as_u16(),
            }),
        };

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
