//! # Track Load Supervisor
//!
//! Runs the fetch + decode pipeline for one track load at a time without
//! blocking input handling. Each load carries the generation tag minted by
//! the controller; starting a new load cancels the previous one, and the
//! controller additionally discards any outcome whose generation is stale —
//! a superseded decode is never applied, even if its task wins the race.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::controller::LoadRequest;
use crate::decoder::decode_first_channel;
use crate::envelope::WaveformEnvelope;
use crate::error::{PlaybackError, Result};

/// Fetches the raw bytes behind a track locator.
///
/// The locator is opaque here — a file path, a static URL, or the
/// authenticated streaming endpoint; the host wires in whichever transport
/// it has.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<Bytes>;
}

/// Result of one completed fetch + decode.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTrack {
    /// Track duration in seconds.
    pub duration: f64,
    /// Display envelope for the whole track.
    pub envelope: WaveformEnvelope,
}

/// Completion message delivered back to the session loop.
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub index: usize,
    pub result: Result<LoadedTrack>,
}

/// Owns the in-flight load, its cancellation token, and the completion
/// channel drained by the session loop.
pub struct LoadSupervisor {
    fetcher: Arc<dyn TrackFetcher>,
    envelope_bins: usize,
    tx: mpsc::UnboundedSender<LoadOutcome>,
    rx: mpsc::UnboundedReceiver<LoadOutcome>,
    active: Option<CancellationToken>,
}

impl LoadSupervisor {
    pub fn new(fetcher: Arc<dyn TrackFetcher>, envelope_bins: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            envelope_bins,
            tx,
            rx,
            active: None,
        }
    }

    /// Start the load described by `request`, cancelling any load still in
    /// flight for a previous generation.
    #[instrument(skip(self, request), fields(index = request.index, generation = request.generation))]
    pub fn begin(&mut self, request: LoadRequest) {
        if let Some(previous) = self.active.take() {
            debug!("cancelling superseded load");
            previous.cancel();
        }

        let token = CancellationToken::new();
        self.active = Some(token.clone());

        let fetcher = Arc::clone(&self.fetcher);
        let bins = self.envelope_bins;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                // Cancelled loads report nothing at all.
                _ = token.cancelled() => return,
                result = load_track(fetcher, request.locator.clone(), bins) => result,
            };
            // The session may already be gone at shutdown; nothing to do then.
            let _ = tx.send(LoadOutcome {
                generation: request.generation,
                index: request.index,
                result,
            });
        });
    }

    /// Drain one finished load, if any. Non-blocking; called from the
    /// session's event loop.
    pub fn try_next(&mut self) -> Option<LoadOutcome> {
        self.rx.try_recv().ok()
    }

    /// Cancel whatever is in flight. Called at teardown.
    pub fn shutdown(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel();
        }
    }
}

impl Drop for LoadSupervisor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The load pipeline: fetch bytes, then decode and downsample on a blocking
/// worker so the event loop stays responsive.
async fn load_track(
    fetcher: Arc<dyn TrackFetcher>,
    locator: String,
    bins: usize,
) -> Result<LoadedTrack> {
    let bytes = fetcher.fetch(&locator).await?;
    debug!(locator = %locator, len = bytes.len(), "track payload fetched");

    tokio::task::spawn_blocking(move || {
        let decoded = decode_first_channel(bytes)?;
        let envelope = WaveformEnvelope::from_samples(&decoded.samples, bins);
        Ok(LoadedTrack {
            duration: decoded.duration_secs(),
            envelope,
        })
    })
    .await
    .map_err(|e| PlaybackError::Internal(format!("decode worker failed: {e}")))?
}
