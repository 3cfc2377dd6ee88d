//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to one endpoint.

pub mod create;
pub mod health;
pub mod redirect;
pub mod resolve;

pub use create::create_link_handler;
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use resolve::resolve_link_handler;
