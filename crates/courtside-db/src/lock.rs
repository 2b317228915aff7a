//! Per-slot advisory locking
//!
//! The availability check and the subsequent insert are two statements, so
//! two concurrent requests for overlapping slots could both pass the check
//! before either writes. A transaction-scoped advisory lock keyed on
//! `(court_id, date)` serializes check+write per court-day; the lock is
//! released automatically at commit or rollback.

use chrono::{Datelike, NaiveDate};
use courtside_core::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

/// Stable 64-bit lock key for a court-day: court id in the high word, days
/// since the common era in the low word.
pub fn slot_lock_key(court_id: i32, date: NaiveDate) -> i64 {
    ((court_id as i64) << 32) | (date.num_days_from_ce() as u32 as i64)
}

/// Acquire the advisory lock for a court-day within the given transaction
pub async fn lock_slot_region(
    tx: &mut Transaction<'_, Postgres>,
    court_id: i32,
    date: NaiveDate,
) -> AppResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(slot_lock_key(court_id, date))
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Database(format!("Failed to acquire slot lock: {}", e)))?;

    Ok(())
}
