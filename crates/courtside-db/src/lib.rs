//! Courtside Database Layer
//!
//! This crate provides PostgreSQL access for the booking engine:
//!
//! - Connection pool management with sqlx
//! - Store implementations for courts, pricing rules, bookings, and
//!   customer counters
//! - Transaction-scoped advisory locking for slot allocation

pub mod lock;
pub mod pool;
pub mod repositories;

pub use lock::{lock_slot_region, slot_lock_key};
pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use courtside_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
