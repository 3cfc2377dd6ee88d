//! API route configuration.

use crate::api::handlers::{create_link_handler, resolve_link_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /save`          - Create (or return) the short link for a URL
/// - `GET  /url/{alias}`   - Look up the original URL behind an alias
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(create_link_handler))
        .route("/url/{alias}", get(resolve_link_handler))
}
