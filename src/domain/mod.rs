//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - The [`repositories::LinkStore`] persistence contract
//! - [`expiry_sweeper`] - Background removal of expired links
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Storage differences (explicit expiry column vs native TTL) surface only as
//!   [`repositories::ExpiryPolicy`], never as backend identity
//! - Business logic is encapsulated in services (see [`crate::application::services`])

pub mod entities;
pub mod expiry_sweeper;
pub mod repositories;
