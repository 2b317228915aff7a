//! Customer counter implementation
//!
//! Applies the best-effort aggregate counters the booking lifecycle derives:
//! bookings created and total spent. Callers treat failures as non-fatal.

use courtside_core::{traits::CustomerCounters, AppError, AppResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of CustomerCounters
pub struct PgCustomerCounters {
    pool: PgPool,
}

impl PgCustomerCounters {
    /// Create a new counter store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerCounters for PgCustomerCounters {
    #[instrument(skip(self))]
    async fn increment_booking_count(&self, customer_id: i32) -> AppResult<()> {
        debug!("Incrementing booking count for customer {}", customer_id);

        sqlx::query(
            r#"
            UPDATE customers
            SET total_bookings = total_bookings + 1,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(customer_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error incrementing booking count for customer {}: {}",
                customer_id, e
            );
            AppError::Database(format!("Failed to increment booking count: {}", e))
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_total_spent(&self, customer_id: i32, amount: Decimal) -> AppResult<()> {
        debug!(
            "Incrementing total spent for customer {} by {}",
            customer_id, amount
        );

        sqlx::query(
            r#"
            UPDATE customers
            SET total_spent = total_spent + $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error incrementing total spent for customer {}: {}",
                customer_id, e
            );
            AppError::Database(format!("Failed to increment total spent: {}", e))
        })?;

        Ok(())
    }
}
