//! Waveline media delivery service.

use std::sync::Arc;

use anyhow::Context;
use core_catalog::TrackCatalog;
use core_runtime::logging::{init_logging, LoggingConfig};
use media_server::{router, AppState, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default()).context("logging init failed")?;

    let config = ServerConfig::from_env().context("invalid configuration")?;

    let catalog = match &config.catalog_path {
        Some(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("reading catalog {}", path.display()))?;
            TrackCatalog::from_json_slice(&bytes).context("parsing catalog")?
        }
        None => TrackCatalog::demo(),
    };
    info!(
        tracks = catalog.len(),
        media_root = %config.media_root.display(),
        "catalog loaded"
    );

    let state = AppState::new(&config, Arc::new(catalog));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
