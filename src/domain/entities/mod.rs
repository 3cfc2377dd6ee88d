//! Core domain entities.
//!
//! - [`Link`] - An alias mapped to its original URL, with an expiry deadline

pub mod link;

pub use link::Link;
