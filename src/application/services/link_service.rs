//! Link creation and resolution service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{Instrument, Span, debug, info, info_span, warn};

use crate::domain::repositories::{ExpiryPolicy, LinkStore, SaveOutcome, StoreError};
use crate::utils::alias_encoder::AliasEncoder;

/// Default lifetime of a link after its last successful resolve.
pub const DEFAULT_LINK_TTL_HOURS: i64 = 24;

/// Errors returned by [`LinkService`].
#[derive(Debug, Error)]
pub enum LinkError {
    /// The alias is unknown or its link has expired.
    #[error("no such link: {alias}")]
    NotFound { alias: String },

    /// The derived alias is already mapped to a different URL.
    #[error("alias {alias} is already mapped to a different URL")]
    AliasCollision { alias: String },

    /// The encoder produced no symbols for this URL.
    #[error("alias derivation produced an empty alias")]
    EmptyAlias,

    #[error("link store failure: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for LinkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { alias } => Self::NotFound { alias },
            other => Self::Store(other),
        }
    }
}

/// Service for creating and resolving short links.
///
/// Stateless apart from its configuration: all mutable state lives in the
/// [`LinkStore`], so one instance is shared by every request handler.
pub struct LinkService<S: LinkStore + ?Sized = dyn LinkStore> {
    store: Arc<S>,
    encoder: AliasEncoder,
    link_ttl: Duration,
    span: Span,
}

impl<S: LinkStore + ?Sized> LinkService<S> {
    /// Creates a new link service.
    ///
    /// `link_ttl` is how long a link stays alive after creation or its last resolve.
    pub fn new(store: Arc<S>, encoder: AliasEncoder, link_ttl: Duration) -> Self {
        Self {
            store,
            encoder,
            link_ttl,
            span: Span::none(),
        }
    }

    /// Attaches the span under which all service operations are logged.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn link_ttl(&self) -> Duration {
        self.link_ttl
    }

    /// Expiry strategy of the underlying store.
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        self.store.expiry_policy()
    }

    /// Returns the alias for `original`, creating the mapping if needed.
    ///
    /// # Idempotence
    ///
    /// If the derived alias already maps to `original`, the alias is returned
    /// without writing. The write itself is an atomic insert-if-absent, so two
    /// concurrent calls for the same URL still produce a single mapping.
    ///
    /// # Errors
    ///
    /// - [`LinkError::AliasCollision`] if the alias belongs to a different URL
    /// - [`LinkError::EmptyAlias`] if the encoder produced no symbols
    /// - [`LinkError::Store`] on any store failure
    pub async fn create_link(&self, original: &str) -> Result<String, LinkError> {
        let span = info_span!(parent: &self.span, "create_link", original = %original);

        async {
            let alias = self.encoder.encode(original);
            if alias.is_empty() {
                return Err(LinkError::EmptyAlias);
            }

            match self.store.check_alias(&alias).await? {
                Some(existing) if existing == original => {
                    debug!(%alias, "Link already exists");
                    return Ok(alias);
                }
                Some(existing) => {
                    warn!(%alias, %existing, "Alias collision between distinct URLs");
                    return Err(LinkError::AliasCollision { alias });
                }
                None => {}
            }

            let expires_at = Utc::now() + self.link_ttl;

            match self.store.save(original, &alias, expires_at).await? {
                SaveOutcome::Created => {
                    info!(%alias, %expires_at, "Link created");
                    Ok(alias)
                }
                SaveOutcome::Occupied(existing) if existing == original => {
                    debug!(%alias, "Link created concurrently by another request");
                    Ok(alias)
                }
                SaveOutcome::Occupied(existing) => {
                    warn!(%alias, %existing, "Alias taken between check and write");
                    Err(LinkError::AliasCollision { alias })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Returns the original URL for `alias` and extends the link's lifetime.
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotFound`] if the alias is unknown or expired
    /// - [`LinkError::Store`] if the lookup or the expiry renewal fails
    pub async fn resolve(&self, alias: &str) -> Result<String, LinkError> {
        let span = info_span!(parent: &self.span, "resolve", alias = %alias);

        async {
            let original = self.store.lookup(alias).await?;

            let expires_at = Utc::now() + self.link_ttl;
            self.store.renew_expiry(expires_at, alias).await?;

            debug!(%original, %expires_at, "Link resolved");
            Ok(original)
        }
        .instrument(span)
        .await
    }
}
