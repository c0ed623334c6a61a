//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database)
//!
//! # Cars
//! GET  /cars                       - Filtered, sorted listing with filter options (JSON)
//! POST /cars                       - Create car (form)
//! POST /cars/{id}                  - Update car (form)
//! POST /cars/{id}/delete           - Delete car
//!
//! # Checkout extension (CORS enabled)
//! POST /api/checkout/long-delivery - Long-delivery notice for a cart (JSON)
//! ```

pub mod cars;
pub mod checkout;
pub mod health;

use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// All admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/cars", get(cars::index).post(cars::create))
        .route("/cars/{id}", post(cars::update))
        .route("/cars/{id}/delete", post(cars::delete))
        .nest("/api", api_routes())
}

/// Routes called from checkout extensions, which run on another origin.
fn api_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/checkout/long-delivery", post(checkout::long_delivery))
        .layer(cors)
}
