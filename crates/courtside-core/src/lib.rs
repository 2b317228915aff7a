//! Courtside Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the Courtside booking engine. It includes:
//!
//! - Domain models (Court, Venue, Booking, PricingRule, TimeSlot)
//! - Storage contracts for courts, rules, bookings, and customer counters
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
