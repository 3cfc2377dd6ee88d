//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects an alias to its original URL.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// Resolves through the same path as `GET /api/url/{alias}`, so every
/// redirect also extends the link's lifetime.
///
/// # Errors
///
/// Returns 404 Not Found if the alias is unknown or has expired.
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original = state.link_service.resolve(&alias).await?;

    Ok(Redirect::temporary(&original))
}
