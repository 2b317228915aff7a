//! Booking handlers
//!
//! HTTP surface for the booking lifecycle: create, fetch, list, reschedule,
//! cancel, check-in, check-out, no-show.

use actix_web::{web, HttpResponse};
use courtside_core::{traits::BookingStore, AppError};
use courtside_db::PgBookingStore;
use tracing::{debug, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    BookingListParams, BookingResponse, CancelBookingRequest, CreateBookingRequest,
    RescheduleRequest,
};
use crate::AppBookingManager;

/// Create a booking
///
/// POST /api/v1/bookings
#[instrument(skip(manager, body))]
pub async fn create_booking(
    manager: web::Data<AppBookingManager>,
    body: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let command = body.into_inner().into_command()?;
    let booking = manager.create(command).await?;

    Ok(HttpResponse::Created().json(BookingResponse::from(booking)))
}

/// Fetch one booking
///
/// GET /api/v1/bookings/{id}
#[instrument(skip(bookings))]
pub async fn get_booking(
    bookings: web::Data<PgBookingStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let booking = bookings
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::BookingNotFound(id.to_string()))?;

    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// List bookings with filters and pagination
///
/// GET /api/v1/bookings
#[instrument(skip(bookings))]
pub async fn list_bookings(
    bookings: web::Data<PgBookingStore>,
    query: web::Query<BookingListParams>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;
    debug!("Listing bookings with filters: {:?}", query);

    let query = query.into_inner().into_query()?;
    let page = query.pagination.page;
    let per_page = query.pagination.per_page;

    let (results, total) = bookings.search(&query).await?;

    let data: Vec<BookingResponse> = results.into_iter().map(Into::into).collect();
    let meta = courtside_core::traits::PaginationMeta::new(total, page, per_page);

    Ok(HttpResponse::Ok().json(courtside_core::traits::PaginatedResponse {
        data,
        pagination: meta,
    }))
}

/// Move a booking to a new time slot
///
/// PUT /api/v1/bookings/{id}/times
#[instrument(skip(manager, body))]
pub async fn reschedule_booking(
    manager: web::Data<AppBookingManager>,
    path: web::Path<Uuid>,
    body: web::Json<RescheduleRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let slot = body.slot()?;
    let booking = manager
        .reschedule(path.into_inner(), slot, body.into_inner().notes)
        .await?;

    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// Cancel a booking
///
/// POST /api/v1/bookings/{id}/cancel
#[instrument(skip(manager, body))]
pub async fn cancel_booking(
    manager: web::Data<AppBookingManager>,
    path: web::Path<Uuid>,
    body: web::Json<CancelBookingRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let booking = manager
        .cancel(path.into_inner(), body.into_inner().reason)
        .await?;

    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// Check a booking in
///
/// POST /api/v1/bookings/{id}/check-in
#[instrument(skip(manager))]
pub async fn check_in_booking(
    manager: web::Data<AppBookingManager>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = manager.check_in(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// Check a booking out
///
/// POST /api/v1/bookings/{id}/check-out
#[instrument(skip(manager))]
pub async fn check_out_booking(
    manager: web::Data<AppBookingManager>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = manager.check_out(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// Mark a booking as a no-show
///
/// POST /api/v1/bookings/{id}/no-show
#[instrument(skip(manager))]
pub async fn mark_no_show(
    manager: web::Data<AppBookingManager>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = manager.mark_no_show(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// Configure booking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("", web::get().to(list_bookings))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}/times", web::put().to(reschedule_booking))
            .route("/{id}/cancel", web::post().to(cancel_booking))
            .route("/{id}/check-in", web::post().to(check_in_booking))
            .route("/{id}/check-out", web::post().to(check_out_booking))
            .route("/{id}/no-show", web::post().to(mark_no_show)),
    );
}
