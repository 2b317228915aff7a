//! Courtside Server
//!
//! Booking backend for a venue's courts: slot allocation, pricing, booking
//! lifecycle, and calendar projection over HTTP.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use courtside_api::handlers::{
    configure_availability, configure_bookings, configure_calendar, configure_pricing,
    health_check,
};
use courtside_core::AppConfig;
use courtside_db::{
    create_pool, PgBookingStore, PgCourtStore, PgCustomerCounters, PgPricingRuleStore,
};
use courtside_services::{
    AvailabilityChecker, BookingManager, BookingSettings, CalendarProjector, PricingEngine,
};
use rust_decimal::Decimal;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))
            // Booking lifecycle endpoints
            .configure(configure_bookings)
            // Read-only availability check
            .configure(configure_availability)
            // Price quotes
            .configure(configure_pricing)
            // Calendar projection
            .configure(configure_calendar),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "courtside={},courtside_api={},courtside_services={},courtside_db={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting Courtside v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().expect("Failed to load configuration");

    let workers = if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    };

    info!("Connecting to database...");
    let pool = create_pool(&config.database.url, Some(config.database.max_connections))
        .await
        .expect("Failed to create database pool");

    // Wire the engine: stores, pricing, availability, lifecycle, calendar
    let courts = Arc::new(PgCourtStore::new(pool.clone()));
    let rules = Arc::new(PgPricingRuleStore::new(pool.clone()));
    let bookings = Arc::new(PgBookingStore::new(pool.clone()));
    let counters = Arc::new(PgCustomerCounters::new(pool.clone()));

    let pricing = Arc::new(PricingEngine::new(
        courts.clone(),
        rules,
        Decimal::from(config.booking.default_price_per_hour),
    ));
    let checker = Arc::new(AvailabilityChecker::new(bookings.clone()));
    let manager = Arc::new(BookingManager::new(
        courts.clone(),
        pricing.clone(),
        bookings.clone(),
        counters,
        Arc::new(pool.clone()),
        BookingSettings {
            auto_confirm: config.booking.auto_confirm,
        },
    ));
    let projector = Arc::new(CalendarProjector::new(courts, bookings.clone()));

    let bind_addr = config.server_addr();
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    let cors_origins = config.server.cors_origins.clone();

    HttpServer::new(move || {
        // Configure CORS - clone origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            // Database pool and engine components
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::from(manager.clone()))
            .app_data(web::Data::from(pricing.clone()))
            .app_data(web::Data::from(checker.clone()))
            .app_data(web::Data::from(projector.clone()))
            .app_data(web::Data::from(bookings.clone()))
            // Reject malformed query strings with a JSON body
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_query",
                        "message": error_message
                    })),
                )
                .into()
            }))
            // Middleware
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            // Configure routes
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
