//! Booking lifecycle manager
//!
//! Owns every state change of a booking:
//! - create: validates court, venue hours, and availability, prices the
//!   slot, persists
//! - reschedule: re-validates availability excluding self, re-prices on
//!   time changes
//! - cancel, check-in, check-out, no-show: guarded status transitions
//!
//! The availability check and the write happen inside one transaction under
//! a per-(court, date) advisory lock, so two concurrent requests for
//! overlapping slots serialize and the loser gets a conflict. Transitions
//! lock the booking row with `FOR UPDATE`; a concurrent writer loses with a
//! stale-state error instead of corrupting state.

use chrono::NaiveDate;
use courtside_core::{
    models::{Booking, BookingStatus, TimeSlot},
    traits::{BookingStore, CourtStore, CustomerCounters, PricingRuleStore},
    AppError, AppResult,
};
use courtside_db::{lock_slot_region, status_strings, BookingRow, BOOKING_COLUMNS};
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::pricing::PricingEngine;

/// Input for creating a booking
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub court_id: i32,
    /// Walk-in bookings have no customer
    pub customer_id: Option<i32>,
    pub date: NaiveDate,
    pub slot: TimeSlot,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub recurring_group: Option<String>,
    /// Staff user entering the booking
    pub created_by: Option<i32>,
}

/// Lifecycle manager settings
#[derive(Debug, Clone)]
pub struct BookingSettings {
    /// Confirm new bookings immediately instead of leaving them pending
    pub auto_confirm: bool,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self { auto_confirm: true }
    }
}

/// Booking lifecycle manager
///
/// Stateless: all booking state lives in storage, the manager only carries
/// its collaborators and settings.
pub struct BookingManager<C, R, B, U>
where
    C: CourtStore,
    R: PricingRuleStore,
    B: BookingStore,
    U: CustomerCounters,
{
    courts: Arc<C>,
    pricing: Arc<PricingEngine<C, R>>,
    bookings: Arc<B>,
    counters: Arc<U>,
    pool: Arc<PgPool>,
    settings: BookingSettings,
}

impl<C, R, B, U> BookingManager<C, R, B, U>
where
    C: CourtStore,
    R: PricingRuleStore,
    B: BookingStore,
    U: CustomerCounters,
{
    /// Create a new booking manager
    pub fn new(
        courts: Arc<C>,
        pricing: Arc<PricingEngine<C, R>>,
        bookings: Arc<B>,
        counters: Arc<U>,
        pool: Arc<PgPool>,
        settings: BookingSettings,
    ) -> Self {
        Self {
            courts,
            pricing,
            bookings,
            counters,
            pool,
            settings,
        }
    }

    /// Create a booking
    ///
    /// # Errors
    ///
    /// - `CourtNotFound` if the court does not exist
    /// - `CourtUnavailable` unless the court is active
    /// - `OutsideVenueHours` if the slot falls outside the venue's open hours
    /// - `SlotConflict` if another slot-blocking booking overlaps
    #[instrument(skip(self, req))]
    pub async fn create(&self, req: CreateBooking) -> AppResult<Booking> {
        let found = self
            .courts
            .find_with_venue(req.court_id)
            .await?
            .ok_or(AppError::CourtNotFound(req.court_id))?;

        if !found.court.status.is_bookable() {
            warn!(
                "Rejecting booking on court {}: status {}",
                found.court.id, found.court.status
            );
            return Err(AppError::CourtUnavailable {
                court_id: found.court.id,
                status: found.court.status.to_string(),
            });
        }

        if !found.venue.covers(&req.slot) {
            return Err(AppError::OutsideVenueHours {
                open: found.venue.open_time.format("%H:%M").to_string(),
                close: found.venue.close_time.format("%H:%M").to_string(),
            });
        }

        let quote = self
            .pricing
            .quote_for_venue(found.venue.id, req.date, &req.slot)
            .await?;

        let status = if self.settings.auto_confirm {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        };

        let mut booking = Booking::new(
            req.court_id,
            req.customer_id,
            req.date,
            req.slot,
            status,
            quote.total,
            Some(quote.applied_rule),
        );
        booking.notes = req.notes;
        booking.is_recurring = req.is_recurring;
        booking.recurring_group = req.recurring_group;
        booking.created_by = req.created_by;

        let mut tx = self.begin().await?;
        lock_slot_region(&mut tx, req.court_id, req.date).await?;

        let conflicts = scan_conflicts(&mut tx, req.court_id, req.date, &req.slot, None).await?;
        if !conflicts.is_empty() {
            info!(
                "Slot {} on court {} {} taken by {} booking(s)",
                req.slot,
                req.court_id,
                req.date,
                conflicts.len()
            );
            return Err(AppError::SlotConflict { conflicts });
        }

        let created = insert_booking(&mut tx, &booking).await?;
        self.commit(tx).await?;

        info!(
            "Created booking {} on court {} {} {}: {} ({})",
            created.id,
            created.court_id,
            created.date,
            req.slot,
            created.total_amount,
            created.status
        );

        if let Some(customer_id) = created.customer_id {
            if let Err(e) = self.counters.increment_booking_count(customer_id).await {
                warn!(
                    "Failed to increment booking count for customer {}: {}",
                    customer_id, e
                );
            }
        }

        Ok(created)
    }

    /// Move a booking to a new time slot on its date
    ///
    /// Re-checks availability excluding the booking itself and re-prices
    /// when the times actually changed. The status is left as is.
    #[instrument(skip(self))]
    pub async fn reschedule(
        &self,
        id: Uuid,
        slot: TimeSlot,
        notes: Option<String>,
    ) -> AppResult<Booking> {
        let existing = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(id.to_string()))?;

        if !existing.status.can_reschedule() {
            return Err(AppError::invalid_transition("reschedule", existing.status));
        }

        let times_changed = slot.start_time() != existing.start_time
            || slot.end_time() != existing.end_time;

        let quote = if times_changed {
            Some(
                self.pricing
                    .quote(existing.court_id, existing.date, &slot)
                    .await?,
            )
        } else {
            None
        };

        let mut tx = self.begin().await?;
        lock_slot_region(&mut tx, existing.court_id, existing.date).await?;

        // Re-read under the lock; a concurrent transition loses here
        let current = fetch_for_update(&mut tx, id).await?;
        if !current.status.can_reschedule() {
            return Err(AppError::invalid_transition("reschedule", current.status));
        }

        if times_changed {
            let conflicts =
                scan_conflicts(&mut tx, current.court_id, current.date, &slot, Some(id)).await?;
            if !conflicts.is_empty() {
                return Err(AppError::SlotConflict { conflicts });
            }
        }

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
            r#"
            UPDATE bookings
            SET start_time = $2,
                end_time = $3,
                total_amount = COALESCE($4, total_amount),
                applied_rule = COALESCE($5, applied_rule),
                notes = COALESCE($6, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(slot.start_time())
        .bind(slot.end_time())
        .bind(quote.as_ref().map(|q| q.total))
        .bind(quote.as_ref().map(|q| q.applied_rule.clone()))
        .bind(notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error rescheduling booking {}: {}", id, e);
            AppError::Database(format!("Failed to reschedule booking: {}", e))
        })?;

        self.commit(tx).await?;

        let updated: Booking = row.into();
        info!(
            "Rescheduled booking {} to {} (total {})",
            id, slot, updated.total_amount
        );

        Ok(updated)
    }

    /// Cancel a booking, appending the reason to its notes
    ///
    /// Allowed from any non-terminal status; cancelling twice fails.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: Uuid, reason: Option<String>) -> AppResult<Booking> {
        let mut tx = self.begin().await?;
        let current = fetch_for_update(&mut tx, id).await?;

        if !current.status.can_cancel() {
            return Err(AppError::invalid_transition("cancel", current.status));
        }

        let notes = match (current.notes.as_deref(), reason.as_deref()) {
            (_, None) => current.notes.clone(),
            (Some(existing), Some(r)) => Some(format!("{existing}\nCancelled: {r}")),
            (None, Some(r)) => Some(format!("Cancelled: {r}")),
        };

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled',
                notes = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error cancelling booking {}: {}", id, e);
            AppError::Database(format!("Failed to cancel booking: {}", e))
        })?;

        self.commit(tx).await?;

        info!("Cancelled booking {}", id);
        Ok(row.into())
    }

    /// Check a confirmed booking in, starting play
    #[instrument(skip(self))]
    pub async fn check_in(&self, id: Uuid) -> AppResult<Booking> {
        let mut tx = self.begin().await?;
        let current = fetch_for_update(&mut tx, id).await?;

        if !current.status.can_check_in() {
            return Err(AppError::invalid_transition("check in", current.status));
        }

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
            r#"
            UPDATE bookings
            SET status = 'in_progress',
                checked_in_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error checking in booking {}: {}", id, e);
            AppError::Database(format!("Failed to check in booking: {}", e))
        })?;

        self.commit(tx).await?;

        info!("Checked in booking {}", id);
        Ok(row.into())
    }

    /// Check a booking out, completing it and charging the customer's
    /// spending counter
    #[instrument(skip(self))]
    pub async fn check_out(&self, id: Uuid) -> AppResult<Booking> {
        let mut tx = self.begin().await?;
        let current = fetch_for_update(&mut tx, id).await?;

        if !current.status.can_check_out() {
            return Err(AppError::invalid_transition("check out", current.status));
        }

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
            r#"
            UPDATE bookings
            SET status = 'completed',
                checked_out_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error checking out booking {}: {}", id, e);
            AppError::Database(format!("Failed to check out booking: {}", e))
        })?;

        self.commit(tx).await?;

        let completed: Booking = row.into();
        info!(
            "Checked out booking {} (charged {})",
            id, completed.total_amount
        );

        if let Some(customer_id) = completed.customer_id {
            if let Err(e) = self
                .counters
                .increment_total_spent(customer_id, completed.total_amount)
                .await
            {
                warn!(
                    "Failed to add {} to total spent for customer {}: {}",
                    completed.total_amount, customer_id, e
                );
            }
        }

        Ok(completed)
    }

    /// Mark a confirmed booking as a no-show, releasing its slot
    #[instrument(skip(self))]
    pub async fn mark_no_show(&self, id: Uuid) -> AppResult<Booking> {
        let mut tx = self.begin().await?;
        let current = fetch_for_update(&mut tx, id).await?;

        if !current.status.can_mark_no_show() {
            return Err(AppError::invalid_transition("mark no-show", current.status));
        }

        let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
            r#"
            UPDATE bookings
            SET status = 'no_show',
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error marking booking {} no-show: {}", id, e);
            AppError::Database(format!("Failed to mark booking no-show: {}", e))
        })?;

        self.commit(tx).await?;

        info!("Marked booking {} as no-show", id);
        Ok(row.into())
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })
    }

    async fn commit(&self, tx: Transaction<'static, Postgres>) -> AppResult<()> {
        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })
    }
}

/// Load slot-blocking bookings on a court/date and keep the overlapping
/// ones. Runs on the caller's transaction so the result stays valid until
/// commit.
async fn scan_conflicts(
    tx: &mut Transaction<'_, Postgres>,
    court_id: i32,
    date: NaiveDate,
    slot: &TimeSlot,
    exclude: Option<Uuid>,
) -> AppResult<Vec<Booking>> {
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
    .bind(status_strings(BookingStatus::slot_blocking()))
    .bind(exclude)
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| {
        error!("Database error scanning for conflicts: {}", e);
        AppError::Database(format!("Failed to scan for conflicts: {}", e))
    })?;

    Ok(rows
        .into_iter()
        .map(Booking::from)
        .filter(|b| b.slot().is_some_and(|s| s.overlaps(slot)))
        .collect())
}

/// Insert a booking within the caller's transaction
async fn insert_booking(
    tx: &mut Transaction<'_, Postgres>,
    booking: &Booking,
) -> AppResult<Booking> {
    let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
        r#"
        INSERT INTO bookings (
            id, court_id, customer_id, date, start_time, end_time,
            status, total_amount, applied_rule, notes,
            is_recurring, recurring_group, created_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(booking.id)
    .bind(booking.court_id)
    .bind(booking.customer_id)
    .bind(booking.date)
    .bind(booking.start_time)
    .bind(booking.end_time)
    .bind(booking.status.to_string())
    .bind(booking.total_amount)
    .bind(&booking.applied_rule)
    .bind(&booking.notes)
    .bind(booking.is_recurring)
    .bind(&booking.recurring_group)
    .bind(booking.created_by)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| {
        error!("Database error creating booking: {}", e);
        AppError::Database(format!("Failed to create booking: {}", e))
    })?;

    Ok(row.into())
}

/// Lock a booking row for the rest of the transaction
async fn fetch_for_update(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> AppResult<Booking> {
    let row = sqlx::query_as::<sqlx::Postgres, BookingRow>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| {
        error!("Database error locking booking {}: {}", id, e);
        AppError::Database(format!("Failed to load booking: {}", e))
    })?
    .ok_or_else(|| AppError::BookingNotFound(id.to_string()))?;

    Ok(row.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveTime, Utc};
    use courtside_core::models::{Court, CourtStatus, CourtWithVenue, PricingRule, Venue};
    use courtside_core::traits::BookingQuery;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sqlx::postgres::PgPoolOptions;

    struct MockCourtStore {
        court: Option<CourtWithVenue>,
    }

    #[async_trait]
    impl CourtStore for MockCourtStore {
        async fn find_with_venue(&self, _id: i32) -> AppResult<Option<CourtWithVenue>> {
            Ok(self.court.clone())
        }

        async fn list_active_by_venue(&self, _venue_id: i32) -> AppResult<Vec<Court>> {
            Ok(vec![])
        }
    }

    struct MockRuleStore;

    #[async_trait]
    impl PricingRuleStore for MockRuleStore {
        async fn list_active_by_venue(&self, _venue_id: i32) -> AppResult<Vec<PricingRule>> {
            Ok(vec![])
        }
    }

    struct MockBookingStore;

    #[async_trait]
    impl BookingStore for MockBookingStore {
        async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<Booking>> {
            Ok(None)
        }

        async fn list_for_slot(
            &self,
            _court_id: i32,
            _date: NaiveDate,
            _statuses: &[BookingStatus],
            _exclude: Option<Uuid>,
        ) -> AppResult<Vec<Booking>> {
            Ok(vec![])
        }

        async fn list_in_range(
            &self,
            _court_ids: &[i32],
            _from: NaiveDate,
            _to: NaiveDate,
            _statuses: &[BookingStatus],
        ) -> AppResult<Vec<Booking>> {
            Ok(vec![])
        }

        async fn search(&self, _query: &BookingQuery) -> AppResult<(Vec<Booking>, i64)> {
            Ok((vec![], 0))
        }
    }

    struct MockCounters;

    #[async_trait]
    impl CustomerCounters for MockCounters {
        async fn increment_booking_count(&self, _customer_id: i32) -> AppResult<()> {
            Ok(())
        }

        async fn increment_total_spent(
            &self,
            _customer_id: i32,
            _amount: Decimal,
        ) -> AppResult<()> {
            Ok(())
        }
    }

    fn court(status: CourtStatus) -> CourtWithVenue {
        let now = Utc::now();
        CourtWithVenue {
            court: Court {
                id: 7,
                venue_id: 1,
                name: "Court 1".to_string(),
                status,
                sort_order: 1,
                created_at: now,
                updated_at: now,
            },
            venue: Venue {
                id: 1,
                name: "Center".to_string(),
                open_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                close_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
                created_at: now,
                updated_at: now,
            },
        }
    }

    fn manager(
        court: Option<CourtWithVenue>,
    ) -> BookingManager<MockCourtStore, MockRuleStore, MockBookingStore, MockCounters> {
        let courts = Arc::new(MockCourtStore { court });
        let pricing = Arc::new(PricingEngine::new(
            courts.clone(),
            Arc::new(MockRuleStore),
            dec!(100000),
        ));
        // Lazy pool on a dead port: connects only if a transaction is
        // actually opened, and then always fails
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost:1/courtside_test")
            .unwrap();

        BookingManager::new(
            courts,
            pricing,
            Arc::new(MockBookingStore),
            Arc::new(MockCounters),
            Arc::new(pool),
            BookingSettings::default(),
        )
    }

    fn request(start: &str, end: &str) -> CreateBooking {
        CreateBooking {
            court_id: 7,
            customer_id: None,
            date: NaiveDate::from_ymd_opt(2026, 6, 9).unwrap(),
            slot: TimeSlot::parse(start, end).unwrap(),
            notes: None,
            is_recurring: false,
            recurring_group: None,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_create_unknown_court_is_not_found() {
        let manager = manager(None);
        let err = manager.create(request("18:00", "19:30")).await.unwrap_err();
        assert!(matches!(err, AppError::CourtNotFound(7)));
    }

    #[tokio::test]
    async fn test_create_rejects_inactive_court() {
        for status in [CourtStatus::Maintenance, CourtStatus::Inactive] {
            let manager = manager(Some(court(status)));
            let err = manager.create(request("18:00", "19:30")).await.unwrap_err();
            assert!(
                matches!(err, AppError::CourtUnavailable { court_id: 7, .. }),
                "{status} court must not accept bookings"
            );
        }
    }

    #[tokio::test]
    async fn test_create_rejects_slot_outside_venue_hours() {
        let manager = manager(Some(court(CourtStatus::Active)));

        let err = manager.create(request("05:00", "07:00")).await.unwrap_err();
        assert!(matches!(err, AppError::OutsideVenueHours { .. }));

        // 23:59 truncates to hour 23 and passes the hours check; the
        // request only dies at the unreachable test database
        let err = manager.create(request("22:00", "23:59")).await.unwrap_err();
        assert!(matches!(err, AppError::Transaction(_)));
    }
}
