//! Application layer services implementing business logic.
//!
//! Services orchestrate the alias encoder and the link store and provide a
//! transport-independent API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation and resolution

pub mod services;
