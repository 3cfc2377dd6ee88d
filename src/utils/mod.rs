//! Helpers shared by the service, the HTTP layer and the admin CLI.
//!
//! - [`alias_encoder`] - Deterministic alias derivation from a URL digest
//! - [`url_validator`] - Absolute URL checks for incoming requests

pub mod alias_encoder;
pub mod url_validator;
