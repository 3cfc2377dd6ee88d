//! Link entity representing an alias-to-URL mapping with an expiry deadline.

use chrono::{DateTime, Utc};

/// A stored mapping from a short alias to the original URL.
///
/// `expires_at` moves forward on every successful resolve. Once it has passed,
/// the link is treated as absent by every store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub original: String,
    pub alias: String,
    pub expires_at: DateTime<Utc>,
}

impl Link {
    pub fn new(
        original: impl Into<String>,
        alias: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            original: original.into(),
            alias: alias.into(),
            expires_at,
        }
    }

    /// Returns true if the expiry deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if the link is expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
