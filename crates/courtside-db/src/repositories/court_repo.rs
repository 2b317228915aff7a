//! Court store implementation
//!
//! Read-only access to courts and their owning venues. Court CRUD lives in
//! venue management; the booking engine only looks courts up.

use courtside_core::{
    models::{Court, CourtStatus, CourtWithVenue, Venue},
    traits::CourtStore,
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of CourtStore
pub struct PgCourtStore {
    pool: PgPool,
}

impl PgCourtStore {
    /// Create a new court store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse court status from string
    fn parse_status(s: &str) -> CourtStatus {
        CourtStatus::from_str(s).unwrap_or(CourtStatus::Inactive)
    }
}

#[async_trait]
impl CourtStore for PgCourtStore {
    #[instrument(skip(self))]
    async fn find_with_venue(&self, id: i32) -> AppResult<Option<CourtWithVenue>> {
        debug!("Finding court with venue: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, CourtVenueRow>(
            r#"
            SELECT
                c.id, c.venue_id, c.name, c.status, c.sort_order,
                c.created_at, c.updated_at,
                v.name AS venue_name, v.open_time, v.close_time,
                v.created_at AS venue_created_at, v.updated_at AS venue_updated_at
            FROM courts c
            JOIN venues v ON v.id = c.venue_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding court {}: {}", id, e);
            AppError::Database(format!("Failed to find court: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_active_by_venue(&self, venue_id: i32) -> AppResult<Vec<Court>> {
        debug!("Listing active courts for venue: {}", venue_id);

        let rows = sqlx::query_as::<sqlx::Postgres, CourtRow>(
            r#"
            SELECT id, venue_id, name, status, sort_order, created_at, updated_at
            FROM courts
            WHERE venue_id = $1 AND status = 'active'
            ORDER BY sort_order, id
            "#,
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing courts for venue {}: {}", venue_id, e);
            AppError::Database(format!("Failed to list courts: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping court rows
#[derive(Debug, sqlx::FromRow)]
struct CourtRow {
    id: i32,
    venue_id: i32,
    name: String,
    status: String,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CourtRow> for Court {
    fn from(row: CourtRow) -> Self {
        Self {
            id: row.id,
            venue_id: row.venue_id,
            name: row.name,
            status: PgCourtStore::parse_status(&row.status),
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Helper struct for the court+venue join
#[derive(Debug, sqlx::FromRow)]
struct CourtVenueRow {
    id: i32,
    venue_id: i32,
    name: String,
    status: String,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    venue_name: String,
    open_time: NaiveTime,
    close_time: NaiveTime,
    venue_created_at: DateTime<Utc>,
    venue_updated_at: DateTime<Utc>,
}

impl From<CourtVenueRow> for CourtWithVenue {
    fn from(row: CourtVenueRow) -> Self {
        Self {
            court: Court {
                id: row.id,
                venue_id: row.venue_id,
                name: row.name,
                status: PgCourtStore::parse_status(&row.status),
                sort_order: row.sort_order,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            venue: Venue {
                id: row.venue_id,
                name: row.venue_name,
                open_time: row.open_time,
                close_time: row.close_time,
                created_at: row.venue_created_at,
                updated_at: row.venue_updated_at,
            },
        }
    }
}
