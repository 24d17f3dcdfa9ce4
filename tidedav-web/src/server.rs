//! Axum server wiring for the WebDAV bridge.
//!
//! WebDAV verbs are not part of axum's routing vocabulary, so everything
//! except `/health` goes through a fallback service that dispatches on the
//! request method. The health route is registered outside the auth layer
//! so monitoring works without credentials.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use tidedav_core::{BackendClient, BridgeConfig};
use tracing::info;

use crate::{auth, dav, health};

/// Shared state for all request handlers.
///
/// The bridge holds no mutable state; both fields are read-only after
/// startup.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BackendClient>,
    pub config: Arc<BridgeConfig>,
}

/// Builds the bridge router for the given state.
///
/// Split out from `run_server` so tests can drive the router directly.
pub fn router(state: AppState) -> Router {
    Router::new()
        .fallback(dav::dispatch)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        .route("/health", get(health::health_check))
        .with_state(state)
}

/// Binds the configured address and serves WebDAV until shutdown.
///
/// # Errors
/// Returns an error if the listen address cannot be bound or the server
/// loop fails.
pub async fn run_server(
    config: BridgeConfig,
    backend: Arc<dyn BackendClient>,
) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = config.bind_addr;
    let state = AppState {
        backend,
        config: Arc::new(config),
    };

    info!(
        "WebDAV bridge listening on {} (backend: {}, auth: {})",
        bind_addr,
        state.config.backend_url,
        if state.config.auth_enabled() {
            "enabled"
        } else {
            "disabled"
        }
    );

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
