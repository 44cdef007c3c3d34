//! # Media Delivery Service
//!
//! The authenticated, range-aware HTTP endpoint that gates byte access to
//! the protected track files, plus the small session-introspection routes
//! the player page uses.
//!
//! ## Endpoints
//!
//! | Path | Description |
//! |------|-------------|
//! | `GET /protected-media/{slug}` | Range-streamed track bytes, session-gated |
//! | `GET /session/whoami` | Credential status, always 200 |
//! | `GET /session/me` | Authenticated identity, 401 otherwise |
//!
//! Requests are stateless and fully parallel: each one is independently
//! authorized (before any file I/O) and served from its own file handle,
//! which is dropped with the response body if the client goes away
//! mid-stream.

pub mod config;
pub mod error;
pub mod range;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the service router over shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/protected-media/{slug}", get(routes::protected_media))
        .route("/session/whoami", get(routes::whoami))
        .route("/session/me", get(routes::me))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
