//! Absolute URL validation for incoming shorten requests.
//!
//! The alias is derived from the exact string the caller submitted, so the
//! URL is only checked here, never rewritten.

use url::Url;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must be absolute with a scheme and a host")]
    NotAbsolute,
}

/// Checks that `input` is an absolute URL with a non-empty scheme and host.
///
/// Surrounding whitespace is removed; the remaining text is returned unchanged.
///
/// # Errors
///
/// - [`UrlValidationError::Empty`] for blank input
/// - [`UrlValidationError::InvalidFormat`] if the URL does not parse
/// - [`UrlValidationError::NotAbsolute`] if the host is missing (e.g. `mailto:`)
///
/// # Examples
///
/// ```ignore
/// assert!(validate_absolute_url("https://example.com/path").is_ok());
/// assert!(validate_absolute_url("example.com").is_err());
/// ```
pub fn validate_absolute_url(input: &str) -> Result<&str, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    let has_host = url.host_str().is_some_and(|host| !host.is_empty());
    if url.scheme().is_empty() || !has_host {
        return Err(UrlValidationError::NotAbsolute);
    }

    Ok(trimmed)
}
