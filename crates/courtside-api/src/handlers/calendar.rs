//! Calendar handler

use actix_web::{web, HttpResponse};
use courtside_core::AppError;
use tracing::instrument;

use crate::dto::{CalendarParams, CalendarResponse};
use crate::AppCalendarProjector;

/// Project a venue's calendar over a date window
///
/// GET /api/v1/venues/{venue_id}/calendar?start=&end=
#[instrument(skip(projector))]
pub async fn venue_calendar(
    projector: web::Data<AppCalendarProjector>,
    path: web::Path<i32>,
    query: web::Query<CalendarParams>,
) -> Result<HttpResponse, AppError> {
    let data = projector
        .project(path.into_inner(), query.start, query.end)
        .await?;

    Ok(HttpResponse::Ok().json(CalendarResponse::from(data)))
}

/// Configure calendar routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/venues").route("/{venue_id}/calendar", web::get().to(venue_calendar)),
    );
}
