//! Booking store implementation
//!
//! Read-side queries for bookings. Writes that must be atomic with an
//! availability check (insert, reschedule, status transitions) run inside
//! the lifecycle manager's transaction; `BookingRow` is shared with that
//! code for row mapping.

use courtside_core::{
    models::{Booking, BookingStatus},
    traits::{BookingQuery, BookingStore},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// Column list shared by every booking query
pub const BOOKING_COLUMNS: &str = "id, court_id, customer_id, date, start_time, end_time, \
     status, total_amount, applied_rule, notes, is_recurring, recurring_group, \
     checked_in_at, checked_out_at, created_by, created_at, updated_at";

/// Render statuses to their storage form
pub fn status_strings(statuses: &[BookingStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.to_string()).collect()
}

/// PostgreSQL implementation of BookingStore
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    /// Create a new booking store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        debug!("Finding booking by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding booking {}: {}", id, e);
            AppError::Database(format!("Failed to find booking: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_for_slot(
        &self,
        court_id: i32,
        date: NaiveDate,
        statuses: &[BookingStatus],
        exclude: Option<Uuid>,
    ) -> AppResult<Vec<Booking>> {
        debug!("Listing bookings for court {} on {}", court_id, date);

        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE court_id = $1
                AND date = $2
                AND status = ANY($3)
                AND ($4::uuid IS NULL OR id <> $4)
            ORDER BY start_time
            "#
        ))
        .bind(court_id)
        .bind(date)
        .bind(status_strings(statuses))
        .bind(exclude)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error listing bookings for court {} on {}: {}",
                court_id, date, e
            );
            AppError::Database(format!("Failed to list bookings: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_in_range(
        &self,
        court_ids: &[i32],
        from: NaiveDate,
        to: NaiveDate,
        statuses: &[BookingStatus],
    ) -> AppResult<Vec<Booking>> {
        debug!(
            "Listing bookings for {} courts between {} and {}",
            court_ids.len(),
            from,
            to
        );

        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE court_id = ANY($1)
                AND date BETWEEN $2 AND $3
                AND status = ANY($4)
            ORDER BY date, start_time
            "#
        ))
        .bind(court_ids.to_vec())
        .bind(from)
        .bind(to)
        .bind(status_strings(statuses))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing bookings in range: {}", e);
            AppError::Database(format!("Failed to list bookings: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &BookingQuery) -> AppResult<(Vec<Booking>, i64)> {
        debug!("Searching bookings: {:?}", query);

        const FILTER: &str = r#"
            ($1::int IS NULL OR court_id = $1)
            AND ($2::int IS NULL OR customer_id = $2)
            AND ($3::int IS NULL OR court_id IN (SELECT id FROM courts WHERE venue_id = $3))
            AND ($4::date IS NULL OR date >= $4)
            AND ($5::date IS NULL OR date <= $5)
            AND ($6::text IS NULL OR status = $6)
        "#;

        let status = query.status.map(|s| s.to_string());

        let (total,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM bookings WHERE {FILTER}"
        ))
        .bind(query.court_id)
        .bind(query.customer_id)
        .bind(query.venue_id)
        .bind(query.date_from)
        .bind(query.date_to)
        .bind(&status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error counting bookings: {}", e);
            AppError::Database(format!("Failed to count bookings: {}", e))
        })?;

        let rows = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE {FILTER}
            ORDER BY date DESC, start_time
            LIMIT $7 OFFSET $8
            "#
        ))
        .bind(query.court_id)
        .bind(query.customer_id)
        .bind(query.venue_id)
        .bind(query.date_from)
        .bind(query.date_to)
        .bind(&status)
        .bind(query.pagination.limit())
        .bind(query.pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error searching bookings: {}", e);
            AppError::Database(format!("Failed to search bookings: {}", e))
        })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

/// Helper struct for mapping booking rows
///
/// Shared with the lifecycle manager, which runs its own statements inside
/// transactions.
#[derive(Debug, sqlx::FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub court_id: i32,
    pub customer_id: Option<i32>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub total_amount: Decimal,
    pub applied_rule: Option<String>,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub recurring_group: Option<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            court_id: row.court_id,
            customer_id: row.customer_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            status: BookingStatus::from_str(&row.status).unwrap_or(BookingStatus::Cancelled),
            total_amount: row.total_amount,
            applied_rule: row.applied_rule,
            notes: row.notes,
            is_recurring: row.is_recurring,
            recurring_group: row.recurring_group,
            checked_in_at: row.checked_in_at,
            checked_out_at: row.checked_out_at,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
