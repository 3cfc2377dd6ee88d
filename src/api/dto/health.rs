//! DTOs for health check endpoint.

use serde::{Deserialize, Serialize};

/// Health check response with component status.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each system component.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub store: StoreCheck,
}

/// Link store health, including how it expires links.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreCheck {
    pub status: String,
    pub backend: String,
    pub expiry_policy: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
