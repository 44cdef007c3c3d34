//! Shared per-request state: the session gate, the catalog, and where the
//! protected files live. Everything here is immutable after startup, so
//! requests are served fully in parallel with no coordination.

use std::path::PathBuf;
use std::sync::Arc;

use core_auth::SessionGate;
use core_catalog::TrackCatalog;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub gate: SessionGate,
    pub catalog: Arc<TrackCatalog>,
    pub media_root: PathBuf,
    pub cookie_name: String,
}

impl AppState {
    pub fn new(config: &ServerConfig, catalog: Arc<TrackCatalog>) -> Self {
        Self {
            gate: SessionGate::new(config.session_secret.as_bytes()),
            catalog,
            media_root: config.media_root.clone(),
            cookie_name: config.cookie_name.clone(),
        }
    }
}
