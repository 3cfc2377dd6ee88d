//! Repository trait definitions for the domain layer.
//!
//! [`LinkStore`] is the only persistence contract of the service. Concrete
//! backends live in `crate::infrastructure::persistence`; a `mockall` mock is
//! generated for unit tests.

pub mod link_store;

pub use link_store::{BoxError, ExpiryPolicy, LinkStore, SaveOutcome, StoreError};

#[cfg(test)]
pub use link_store::MockLinkStore;
