//! # HTTP Server
//!
//! REST API over a [`SwdocsApi`]. Routes live in [`routes`]; this module
//! owns the shared state and the listener.
//!
//! Store calls are blocking, so every handler hops onto tokio's blocking
//! pool before touching the facade. Write contention is still decided by
//! the store's write gate, not by the runtime.

use crate::api::SwdocsApi;
use crate::error::Result;
use crate::store::DocumentStore;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod routes;

/// Request header naming the caller; overrides the payload's `user`.
pub const USER_HEADER: &str = "x-swdocs-user";

pub struct AppState<S: DocumentStore> {
    pub api: SwdocsApi<S>,
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(api: SwdocsApi<S>) -> Self {
        Self { api }
    }
}

pub fn create_router<S: DocumentStore + 'static>(state: Arc<AppState<S>>) -> Router {
    routes::swdocs_routes(state).layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve<S: DocumentStore + 'static>(api: SwdocsApi<S>, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "swdocs server listening");

    let app = create_router(Arc::new(AppState::new(api)));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("swdocs server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
