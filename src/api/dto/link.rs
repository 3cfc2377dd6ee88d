//! DTOs for link creation and resolution endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::url_validator::validate_absolute_url;

fn absolute_url(url: &str) -> Result<(), ValidationError> {
    validate_absolute_url(url).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("absolute_url");
        error.message = Some(e.to_string().into());
        error
    })
}

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Absolute URL with scheme and host; aliased exactly as submitted.
    #[validate(custom(function = "absolute_url"))]
    pub url: String,
}

/// A freshly created (or already existing) short link.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    /// Public short link: base URL followed by the alias.
    pub url: String,
    pub alias: String,
    pub original: String,
}

/// Original URL behind an alias.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveLinkResponse {
    /// The original URL.
    pub url: String,
    pub alias: String,
}
