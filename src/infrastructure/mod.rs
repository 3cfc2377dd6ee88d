//! Infrastructure layer for external integrations.
//!
//! Implements the [`crate::domain::repositories::LinkStore`] contract on top
//! of concrete storage engines.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL, Redis and in-memory link stores

pub mod persistence;
