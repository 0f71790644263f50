//! # Routes
//!
//! Axum router configuration for the storefront.
//! Both flavors' checkout and portal paths are always mounted.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the main application router
///
/// Routes:
/// - Pages:
///   - GET /        - Home page (product links, portal form)
///   - GET /health  - Health check
///
/// - Checkout:
///   - GET /checkout?products={id}     - Minimal flavor link
///   - GET /api/checkout?product={id}  - Showcase flavor link
///
/// - Customer portal:
///   - GET /portal?email=...
///   - GET /api/portal?email=...
///
/// - Webhooks:
///   - POST /polar/webhooks - Polar webhook handler
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/checkout", get(handlers::checkout))
        .route("/portal", get(handlers::portal));

    // Webhook routes (must accept raw body)
    let webhook_routes = Router::new().route("/webhooks", post(handlers::polar_webhook));

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/checkout", get(handlers::checkout))
        .route("/portal", get(handlers::portal))
        .nest("/api", api_routes)
        .nest("/polar", webhook_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
