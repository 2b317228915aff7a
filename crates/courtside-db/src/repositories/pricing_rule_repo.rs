//! Pricing rule store implementation
//!
//! Read-only access to a venue's pricing rules. Retrieval order is priority
//! descending with id as a stable tie-break; the resolver relies on this
//! order for its first-seen-wins behavior.

use courtside_core::{
    models::{DayOfWeek, PricingRule},
    traits::PricingRuleStore,
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of PricingRuleStore
pub struct PgPricingRuleStore {
    pool: PgPool,
}

impl PgPricingRuleStore {
    /// Create a new pricing rule store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PricingRuleStore for PgPricingRuleStore {
    #[instrument(skip(self))]
    async fn list_active_by_venue(&self, venue_id: i32) -> AppResult<Vec<PricingRule>> {
        debug!("Listing active pricing rules for venue: {}", venue_id);

        let rows = sqlx::query_as::<sqlx::Postgres, PricingRuleRow>(
            r#"
            SELECT
                id, venue_id, name, day_of_week, start_time, end_time,
                price_per_hour, priority, is_active, created_at, updated_at
            FROM pricing_rules
            WHERE venue_id = $1 AND is_active
            ORDER BY priority DESC, id
            "#,
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error listing pricing rules for venue {}: {}",
                venue_id, e
            );
            AppError::Database(format!("Failed to list pricing rules: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping pricing rule rows
#[derive(Debug, sqlx::FromRow)]
struct PricingRuleRow {
    id: i32,
    venue_id: i32,
    name: String,
    day_of_week: Option<String>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    price_per_hour: Decimal,
    priority: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PricingRuleRow> for PricingRule {
    fn from(row: PricingRuleRow) -> Self {
        Self {
            id: row.id,
            venue_id: row.venue_id,
            name: row.name,
            day_of_week: row.day_of_week.as_deref().and_then(DayOfWeek::from_str),
            start_time: row.start_time,
            end_time: row.end_time,
            price_per_hour: row.price_per_hour,
            priority: row.priority,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
