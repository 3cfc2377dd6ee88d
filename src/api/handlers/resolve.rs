//! Handler for alias lookup endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::link::ResolveLinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the original URL behind an alias.
///
/// # Endpoint
///
/// `GET /api/url/{alias}`
///
/// A successful lookup extends the link's lifetime by the configured TTL.
///
/// # Errors
///
/// Returns 404 Not Found if the alias is unknown or has expired.
pub async fn resolve_link_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ResolveLinkResponse>, AppError> {
    let url = state.link_service.resolve(&alias).await?;

    Ok(Json(ResolveLinkResponse { url, alias }))
}
