//! End-to-end booking flow against a real database
//!
//! Requires a PostgreSQL instance and `DATABASE_URL`; run with
//! `cargo test -p courtside-services -- --ignored`.

use chrono::NaiveDate;
use courtside_core::models::{BookingStatus, TimeSlot};
use courtside_db::{
    create_pool, PgBookingStore, PgCourtStore, PgCustomerCounters, PgPricingRuleStore,
};
use courtside_services::{
    AvailabilityChecker, BookingManager, BookingSettings, CalendarProjector, CreateBooking,
    PricingEngine,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use std::sync::Arc;

type Manager = BookingManager<PgCourtStore, PgPricingRuleStore, PgBookingStore, PgCustomerCounters>;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS venues (
    id INT PRIMARY KEY,
    name TEXT NOT NULL,
    open_time TIME NOT NULL,
    close_time TIME NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS courts (
    id INT PRIMARY KEY,
    venue_id INT NOT NULL REFERENCES venues(id),
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    sort_order INT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS pricing_rules (
    id INT PRIMARY KEY,
    venue_id INT NOT NULL REFERENCES venues(id),
    name TEXT NOT NULL,
    day_of_week TEXT,
    start_time TIME,
    end_time TIME,
    price_per_hour NUMERIC(14, 0) NOT NULL,
    priority INT NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS customers (
    id INT PRIMARY KEY,
    full_name TEXT NOT NULL,
    total_bookings INT NOT NULL DEFAULT 0,
    total_spent NUMERIC(14, 0) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS bookings (
    id UUID PRIMARY KEY,
    court_id INT NOT NULL REFERENCES courts(id),
    customer_id INT REFERENCES customers(id),
    date DATE NOT NULL,
    start_time TIME NOT NULL,
    end_time TIME NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    total_amount NUMERIC(14, 0) NOT NULL DEFAULT 0,
    applied_rule TEXT,
    notes TEXT,
    is_recurring BOOLEAN NOT NULL DEFAULT FALSE,
    recurring_group TEXT,
    checked_in_at TIMESTAMPTZ,
    checked_out_at TIMESTAMPTZ,
    created_by INT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

async fn setup(pool: &PgPool) {
    for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
        sqlx::query(statement).execute(pool).await.unwrap();
    }

    sqlx::query("TRUNCATE bookings, pricing_rules, courts, customers, venues")
        .execute(pool)
        .await
        .unwrap();

    sqlx::query(
        "INSERT INTO venues (id, name, open_time, close_time) VALUES (1, 'Center', '06:00', '23:00')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO courts (id, venue_id, name, status, sort_order) VALUES (7, 1, 'Court X', 'active', 1)")
        .execute(pool)
        .await
        .unwrap();

    sqlx::query(
        "INSERT INTO pricing_rules (id, venue_id, name, price_per_hour, priority) \
         VALUES (1, 1, 'standard', 150000, 0)",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO pricing_rules (id, venue_id, name, start_time, end_time, price_per_hour, priority) \
         VALUES (2, 1, 'peak', '17:00', '21:00', 200000, 10)",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO customers (id, full_name) VALUES (42, 'Linh Tran')")
        .execute(pool)
        .await
        .unwrap();
}

fn manager(pool: &PgPool) -> (Manager, Arc<PgBookingStore>, Arc<PgCourtStore>) {
    let courts = Arc::new(PgCourtStore::new(pool.clone()));
    let rules = Arc::new(PgPricingRuleStore::new(pool.clone()));
    let bookings = Arc::new(PgBookingStore::new(pool.clone()));
    let counters = Arc::new(PgCustomerCounters::new(pool.clone()));
    let pricing = Arc::new(PricingEngine::new(
        courts.clone(),
        rules,
        courtside_services::constants::DEFAULT_PRICE_PER_HOUR,
    ));

    let manager = BookingManager::new(
        courts.clone(),
        pricing,
        bookings.clone(),
        counters,
        Arc::new(pool.clone()),
        BookingSettings::default(),
    );

    (manager, bookings, courts)
}

fn request(customer_id: Option<i32>, start: &str, end: &str) -> CreateBooking {
    CreateBooking {
        court_id: 7,
        customer_id,
        // 2026-06-09 is a Tuesday
        date: NaiveDate::from_ymd_opt(2026, 6, 9).unwrap(),
        slot: TimeSlot::parse(start, end).unwrap(),
        notes: None,
        is_recurring: false,
        recurring_group: None,
        created_by: None,
    }
}

async fn customer_counters(pool: &PgPool, id: i32) -> (i32, Decimal) {
    sqlx::query_as("SELECT total_bookings, total_spent FROM customers WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore] // Requires database
async fn test_booking_flow_end_to_end() {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = create_pool(&url, Some(5)).await.unwrap();
    setup(&pool).await;

    let (manager, bookings, courts) = manager(&pool);
    let checker = AvailabilityChecker::new(bookings.clone());
    let date = NaiveDate::from_ymd_opt(2026, 6, 9).unwrap();

    // Peak rule prices a contained Tuesday evening slot
    let booking = manager
        .create(request(Some(42), "18:00", "19:30"))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.total_amount, dec!(300000));
    assert_eq!(booking.applied_rule.as_deref(), Some("peak"));

    let (total_bookings, _) = customer_counters(&pool, 42).await;
    assert_eq!(total_bookings, 1);

    // Overlapping request is rejected with the conflicting booking attached
    let err = manager
        .create(request(None, "17:30", "18:30"))
        .await
        .unwrap_err();
    match err {
        courtside_core::AppError::SlotConflict { conflicts } => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].id, booking.id);
        }
        other => panic!("expected SlotConflict, got {other:?}"),
    }

    let availability = checker
        .check(7, date, &TimeSlot::parse("17:30", "18:30").unwrap(), None)
        .await
        .unwrap();
    assert!(!availability.available);
    assert_eq!(availability.conflicts.len(), 1);

    // Check-in then check-out; the spend counter picks up the total
    let booking = manager.check_in(booking.id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::InProgress);
    assert!(booking.checked_in_at.is_some());

    let err = manager.check_in(booking.id).await.unwrap_err();
    assert!(matches!(
        err,
        courtside_core::AppError::InvalidTransition { .. }
    ));

    let booking = manager.check_out(booking.id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Completed);
    assert!(booking.checked_out_at.is_some());

    let (_, total_spent) = customer_counters(&pool, 42).await;
    assert_eq!(total_spent, dec!(300000));

    // Terminal booking rejects further transitions
    let err = manager.cancel(booking.id, None).await.unwrap_err();
    assert!(matches!(
        err,
        courtside_core::AppError::InvalidTransition { .. }
    ));

    // Completed bookings free the slot
    let availability = checker
        .check(7, date, &TimeSlot::parse("18:00", "19:30").unwrap(), None)
        .await
        .unwrap();
    assert!(availability.available);

    // Reschedule re-prices: 16:00-18:00 leaves the peak window, 2h standard
    let morning = manager.create(request(None, "10:00", "11:00")).await.unwrap();
    let moved = manager
        .reschedule(
            morning.id,
            TimeSlot::parse("16:00", "18:00").unwrap(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(moved.total_amount, dec!(300000));
    assert_eq!(moved.applied_rule.as_deref(), Some("standard"));
    assert_eq!(moved.status, BookingStatus::Confirmed);

    // Cancel appends the reason and is not idempotent
    let cancelled = manager
        .cancel(moved.id, Some("rain".to_string()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(cancelled.notes.as_deref().unwrap().contains("Cancelled: rain"));

    let err = manager.cancel(moved.id, None).await.unwrap_err();
    assert!(matches!(
        err,
        courtside_core::AppError::InvalidTransition { .. }
    ));

    // Calendar projects the completed booking but not the cancelled one
    let projector = CalendarProjector::new(courts, bookings);
    let calendar = projector.project(1, date, date).await.unwrap();
    assert_eq!(calendar.courts.len(), 1);
    assert_eq!(calendar.bookings.len(), 1);
    assert_eq!(calendar.bookings[0].status, BookingStatus::Completed);
}
