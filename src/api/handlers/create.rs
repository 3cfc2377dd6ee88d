//! Handler for link creation endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, CreateLinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates the short link for a URL, or returns the existing one.
///
/// # Endpoint
///
/// `POST /api/save`
///
/// # Request Body
///
/// ```json
/// { "url": "https://www.ozon.ru" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "http://localhost:3000/bGKXWuqfNR",
///   "alias": "bGKXWuqfNR",
///   "original": "https://www.ozon.ru"
/// }
/// ```
///
/// Submitting the same URL again returns the same alias without a new write.
///
/// # Errors
///
/// - 400 Bad Request if the URL is not absolute
/// - 409 Conflict if the derived alias already belongs to another URL
/// - 500 Internal Server Error on store failure
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<CreateLinkResponse>, AppError> {
    payload.validate()?;

    let original = payload.url.trim();
    let alias = state.link_service.create_link(original).await?;

    Ok(Json(CreateLinkResponse {
        url: state.short_url(&alias),
        alias,
        original: original.to_string(),
    }))
}
