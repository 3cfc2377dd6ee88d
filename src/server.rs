//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, sweeper spawning, and Axum server lifecycle.

use crate::application::services::LinkService;
use crate::config::Config;
use crate::domain::expiry_sweeper::spawn_expiry_sweeper;
use crate::infrastructure::persistence::connect_store;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info_span;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store for the configured backend (migrations included for PostgreSQL)
/// - Expiry sweeper, if the store does not expire links natively
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the server stops accepting connections, drains
/// in-flight requests, stops the sweeper and closes the store.
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be reached
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let encoder = config.alias_encoder()?;
    let store_config = config.store_config()?;

    let store = connect_store(&store_config)
        .await
        .context("Failed to connect link store")?;

    let link_service = LinkService::new(store.clone(), encoder, config.link_ttl()?)
        .with_span(info_span!("link_service", backend = store.backend_name()));

    let sweeper = if link_service.expiry_policy().needs_sweep() {
        let handle = spawn_expiry_sweeper(
            store.clone(),
            config.sweep_interval(),
            info_span!("expiry_sweeper", backend = store.backend_name()),
        );
        tracing::info!("Expiry sweeper started");
        Some(handle)
    } else {
        tracing::info!("Store expires links natively, sweeper disabled");
        None
    };

    let state = AppState::new(Arc::new(link_service), &config.public_base_url);

    let app = app_router(state, config.request_timeout());

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let served = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    if let Some(handle) = sweeper {
        handle.abort();
    }

    if let Err(e) = store.close().await {
        tracing::warn!(error = %e, "Failed to close link store");
    }

    served?;
    tracing::info!("Server stopped");

    Ok(())
}

/// Completes on Ctrl-C, or on SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
