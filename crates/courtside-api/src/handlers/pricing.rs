//! Pricing handler

use actix_web::{web, HttpResponse};
use courtside_core::AppError;
use tracing::instrument;
use validator::Validate;

use crate::dto::{QuoteParams, QuoteResponse};
use crate::AppPricingEngine;

/// Quote the price for a slot
///
/// GET /api/v1/pricing/quote
#[instrument(skip(pricing))]
pub async fn quote(
    pricing: web::Data<AppPricingEngine>,
    query: web::Query<QuoteParams>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let slot = query.slot()?;
    let quote = pricing.quote(query.court_id, query.date, &slot).await?;

    Ok(HttpResponse::Ok().json(QuoteResponse::from(quote)))
}

/// Configure pricing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/pricing").route("/quote", web::get().to(quote)));
}
