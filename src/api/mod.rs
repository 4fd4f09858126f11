//! JSON API over the calculation core.
//!
//! Every endpoint is a stateless `POST`:
//! - `/stc`, `/eligibility`, `/compliance`, `/projection` run one component
//! - `/quote` runs all of them for one installation
//! - `/submission/transition` checks a lifecycle step
//!
//! Validation failures answer 400 and illegal transitions 409.

mod handlers;
pub mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use tracing::info;

use crate::config::QuoteConfig;

/// Immutable application state shared across all request handlers.
pub struct AppState {
    /// Pricing, limits and projection defaults applied to every request.
    pub config: QuoteConfig,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/stc", post(handlers::post_stc))
        .route("/eligibility", post(handlers::post_eligibility))
        .route("/compliance", post(handlers::post_compliance))
        .route("/projection", post(handlers::post_projection))
        .route("/quote", post(handlers::post_quote))
        .route("/submission/transition", post(handlers::post_transition))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
