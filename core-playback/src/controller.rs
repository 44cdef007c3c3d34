//! # Transport State Machine
//!
//! Owns the playback session: current track, position, playing/paused, and
//! the track-switch walk that skips non-playable entries. All mutation goes
//! through this controller; the renderer and input layers only read.
//!
//! ## States
//!
//! ```text
//! Idle ──initialize──> Loading ──decode ok──> Paused <──> Playing
//!                        ▲                                   │
//!                        └────────── switch_track ───────────┘
//! ```
//!
//! `Idle` is only left if the catalog has a playable track, and only
//! re-entered at teardown.

use std::sync::Arc;

use core_catalog::TrackCatalog;
use tracing::{debug, warn};

use crate::envelope::WaveformEnvelope;
use crate::supervisor::LoadOutcome;

/// Transport states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No track loaded (empty or fully-unplayable catalog).
    Idle,
    /// A fetch + decode is in flight for the current track.
    Loading,
    /// Track ready, transport paused.
    Paused,
    /// Track ready, position advancing.
    Playing,
}

/// Read-only snapshot of the transport, taken once per frame by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSession {
    pub current_index: Option<usize>,
    /// Track duration in seconds; 0 until the first decode completes.
    pub duration: f64,
    /// Playback position in seconds, within `[0, duration]`.
    pub position: f64,
    pub is_playing: bool,
}

/// A track load the supervisor should start on the controller's behalf.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub index: usize,
    /// Tag that must match at completion for the result to be applied.
    pub generation: u64,
    pub locator: String,
    pub autoplay: bool,
}

/// The playback state machine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use core_catalog::TrackCatalog;
/// use core_playback::PlaybackController;
///
/// let mut controller = PlaybackController::new(Arc::new(TrackCatalog::demo()));
/// let load = controller.initialize().expect("demo catalog has a playable track");
/// assert_eq!(load.index, 0);
/// assert!(!load.autoplay);
/// ```
#[derive(Debug)]
pub struct PlaybackController {
    catalog: Arc<TrackCatalog>,
    state: PlayerState,
    current_index: Option<usize>,
    duration: f64,
    position: f64,
    generation: u64,
    pending_autoplay: bool,
    /// True once the current generation decoded successfully; gates `Playing`.
    media_ready: bool,
    envelope: Option<WaveformEnvelope>,
}

impl PlaybackController {
    pub fn new(catalog: Arc<TrackCatalog>) -> Self {
        Self {
            catalog,
            state: PlayerState::Idle,
            current_index: None,
            duration: 0.0,
            position: 0.0,
            generation: 0,
            pending_autoplay: false,
            media_ready: false,
            envelope: None,
        }
    }

    /// Select the first playable track (scanning forward from before the
    /// start) and request its load, without autoplay.
    ///
    /// With no playable track the controller stays `Idle` indefinitely and
    /// returns `None`; the renderer draws an empty surface.
    pub fn initialize(&mut self) -> Option<LoadRequest> {
        let index = self.catalog.first_playable()?;
        Some(self.begin_load(index, false))
    }

    /// Switch to `requested`, walking outward in the direction of travel to
    /// the nearest playable index when the requested track is not playable.
    ///
    /// No-op (returns `None`) when the request is the current track, when no
    /// playable track exists in that direction (no wrap-around), or when the
    /// walk lands back on the current track.
    pub fn switch_track(&mut self, requested: usize) -> Option<LoadRequest> {
        if self.current_index == Some(requested) {
            return None;
        }

        let from = self.current_index.map(|i| i as isize).unwrap_or(-1);
        let index = if self.catalog.is_playable(requested) {
            requested
        } else {
            let step = if requested as isize > from { 1 } else { -1 };
            match self.catalog.next_playable_from(from, step) {
                Some(index) if Some(index) != self.current_index => index,
                _ => {
                    debug!(requested, "no playable track in direction of travel");
                    return None;
                }
            }
        };

        Some(self.begin_load(index, true))
    }

    fn begin_load(&mut self, index: usize, autoplay: bool) -> LoadRequest {
        // Playable implies a locator; an empty locator would mean the catalog
        // lied, in which case the load fails downstream rather than here.
        let locator = self
            .catalog
            .get(index)
            .and_then(|t| t.locator.clone())
            .unwrap_or_default();

        self.generation += 1;
        self.current_index = Some(index);
        self.state = PlayerState::Loading;
        self.position = 0.0;
        self.media_ready = false;
        self.pending_autoplay = autoplay;
        // duration and envelope keep their previous values while the new
        // decode is in flight; the old waveform stays on screen.

        debug!(index, generation = self.generation, autoplay, "track load requested");
        LoadRequest {
            index,
            generation: self.generation,
            locator,
            autoplay,
        }
    }

    /// Apply a finished load.
    ///
    /// Outcomes tagged with a superseded generation are discarded — never
    /// applied to the now-current envelope or duration. Returns whether the
    /// outcome was accepted.
    pub fn apply_decode(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "discarding superseded decode"
            );
            return false;
        }

        match outcome.result {
            Ok(loaded) => {
                self.duration = loaded.duration;
                self.envelope = Some(loaded.envelope);
                self.position = 0.0;
                self.media_ready = true;
                self.state = if self.pending_autoplay {
                    PlayerState::Playing
                } else {
                    PlayerState::Paused
                };
            }
            Err(e) => {
                // Degrade to a static, silent transport: the prior envelope
                // and duration stay in place and the render loop keeps going.
                warn!(index = outcome.index, error = %e, "track load failed");
                self.media_ready = false;
                self.state = PlayerState::Paused;
            }
        }
        self.pending_autoplay = false;
        true
    }

    /// Flip between playing and paused. No-op in `Idle`/`Loading`, and while
    /// the current track has no decoded media (a failed load).
    pub fn toggle_play_pause(&mut self) {
        match self.state {
            PlayerState::Playing => self.state = PlayerState::Paused,
            PlayerState::Paused if self.media_ready => self.state = PlayerState::Playing,
            _ => {}
        }
    }

    /// Seek to `target` seconds, clamped to `[0, duration]`. Playing stays
    /// playing, paused stays paused; a pure seek never starts playback.
    pub fn seek(&mut self, target: f64) {
        match self.state {
            PlayerState::Paused | PlayerState::Playing => {
                self.position = target.clamp(0.0, self.duration);
            }
            PlayerState::Idle | PlayerState::Loading => {}
        }
    }

    /// Advance the playback clock by `dt` seconds while playing. Reaching the
    /// end of the track pauses at the end.
    pub fn advance(&mut self, dt: f64) {
        if self.state != PlayerState::Playing {
            return;
        }
        self.position += dt;
        if self.position >= self.duration {
            self.position = self.duration;
            self.state = PlayerState::Paused;
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Envelope of the most recently decoded track, if any.
    pub fn envelope(&self) -> Option<&WaveformEnvelope> {
        self.envelope.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn session(&self) -> PlaybackSession {
        PlaybackSession {
            current_index: self.current_index,
            duration: self.duration,
            position: self.position,
            is_playing: self.is_playing(),
        }
    }

    pub fn catalog(&self) -> &Arc<TrackCatalog> {
        &self.catalog
    }
}
