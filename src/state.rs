//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    /// Always ends with `/`.
    pub public_base_url: Arc<str>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>, public_base_url: &str) -> Self {
        let public_base_url = if public_base_url.ends_with('/') {
            public_base_url.to_string()
        } else {
            format!("{public_base_url}/")
        };

        Self {
            link_service,
            public_base_url: public_base_url.into(),
        }
    }

    /// Public short link for `alias`.
    pub fn short_url(&self, alias: &str) -> String {
        format!("{}{}", self.public_base_url, alias)
    }
}
