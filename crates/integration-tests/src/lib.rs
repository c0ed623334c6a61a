//! Integration tests for Fleetdesk.
//!
//! # Running Tests
//!
//! ```bash
//! # Router tests (no database needed)
//! cargo test -p fleetdesk-integration-tests
//!
//! # Live tests against a running admin server with a migrated, seeded database
//! cargo run -p fleetdesk-cli -- migrate
//! cargo run -p fleetdesk-cli -- seed fuel-types
//! cargo run -p fleetdesk-admin &
//! cargo test -p fleetdesk-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `admin_router` - Drives the router in-process via `tower::ServiceExt`
//! - `admin_cars` - Car CRUD against a live server

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::Response;
use sqlx::postgres::PgPoolOptions;

use fleetdesk_admin::state::AppState;

/// Connection string the in-process router's pool points at. Nothing
/// listens there, so any handler that touches the database fails fast.
pub const UNREACHABLE_DATABASE_URL: &str = "postgres://fleetdesk@127.0.0.1:1/fleetdesk";

/// Base URL for the live admin server (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Build the admin router over a lazily connected pool.
///
/// Must be called inside a Tokio runtime.
///
/// # Panics
///
/// Panics if the database URL cannot be parsed.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_app() -> Router {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(UNREACHABLE_DATABASE_URL)
        .expect("valid database URL");

    fleetdesk_admin::app(AppState::new(pool))
}

/// Collect a response body as JSON.
///
/// # Panics
///
/// Panics if the body cannot be read or is not JSON.
#[allow(clippy::expect_used)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
