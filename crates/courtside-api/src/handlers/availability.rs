//! Availability handler
//!
//! Read-only slot check for booking screens. The authoritative check happens
//! again inside the create/reschedule transaction.

use actix_web::{web, HttpResponse};
use courtside_core::AppError;
use tracing::instrument;
use validator::Validate;

use crate::dto::{AvailabilityParams, AvailabilityResponse};
use crate::AppAvailabilityChecker;

/// Check whether a slot is free
///
/// GET /api/v1/availability
#[instrument(skip(checker))]
pub async fn check_availability(
    checker: web::Data<AppAvailabilityChecker>,
    query: web::Query<AvailabilityParams>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let slot = query.slot()?;
    let availability = checker
        .check(query.court_id, query.date, &slot, query.exclude_booking_id)
        .await?;

    Ok(HttpResponse::Ok().json(AvailabilityResponse::from(availability)))
}

/// Configure availability routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/availability", web::get().to(check_availability));
}
