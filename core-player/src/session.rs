//! # Player Session
//!
//! The lifecycle object behind one scrubber instance. It owns the transport,
//! the load supervisor, the gesture router, the renderer, and the inactivity
//! overlay, and it is the only place they meet: events come in, intents are
//! applied, finished decodes are drained, frames go out.
//!
//! The session is single-threaded and cooperative. Decodes run on the
//! supervisor's background task and come back as messages, so input handling
//! stays responsive while a load is in flight; a newer track switch cancels
//! interest in the old one.

use std::sync::Arc;
use std::time::Instant;

use core_catalog::TrackCatalog;
use core_playback::{
    LoadSupervisor, PlaybackController, TrackFetcher, DEFAULT_ENVELOPE_BINS,
};
use tracing::debug;

use crate::gesture::{InputEvent, PlayerIntent, ScrubGestureRouter};
use crate::overlay::OverlayFade;
use crate::render::{RenderSurface, WaveformRenderer};
use crate::view::{TimeAxis, ViewMode};

/// Construction-time knobs, mirroring what a host page would configure.
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub view_mode: ViewMode,
    pub envelope_bins: usize,
    pub surface_width: f32,
    pub surface_height: f32,
    pub overlay_delay: std::time::Duration,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Full,
            envelope_bins: DEFAULT_ENVELOPE_BINS,
            surface_width: 1280.0,
            surface_height: 720.0,
            overlay_delay: std::time::Duration::from_secs(1),
        }
    }
}

/// One live scrubber: state machine, pipeline, input, and paint.
pub struct PlayerSession {
    controller: PlaybackController,
    supervisor: LoadSupervisor,
    router: ScrubGestureRouter,
    renderer: WaveformRenderer,
    overlay: OverlayFade,
    view_mode: ViewMode,
    width: f32,
    height: f32,
    needs_redraw: bool,
    last_frame: Option<Instant>,
}

impl PlayerSession {
    /// Build the session and kick off the initial load of the first playable
    /// track (paused; playback starts on the first tap).
    pub fn new(
        catalog: Arc<TrackCatalog>,
        fetcher: Arc<dyn TrackFetcher>,
        options: PlayerOptions,
    ) -> Self {
        let mut controller = PlaybackController::new(catalog);
        let mut supervisor = LoadSupervisor::new(fetcher, options.envelope_bins);
        if let Some(request) = controller.initialize() {
            supervisor.begin(request);
        }
        Self {
            controller,
            supervisor,
            router: ScrubGestureRouter::new(),
            renderer: WaveformRenderer::default(),
            overlay: OverlayFade::new(options.overlay_delay),
            view_mode: options.view_mode,
            width: options.surface_width,
            height: options.surface_height,
            needs_redraw: true,
            last_frame: None,
        }
    }

    /// The time↔pixel mapping for the current transport state. Shared by
    /// drawing and drag interpretation within a frame.
    fn axis(&self) -> TimeAxis {
        TimeAxis::compute(
            self.view_mode,
            self.controller.duration(),
            self.controller.position(),
            self.width,
        )
    }

    /// Feed one raw input event through the router and apply the resulting
    /// intents.
    pub fn handle_event(&mut self, event: InputEvent, now: Instant) {
        let axis = self.axis();
        let is_playing = self.controller.is_playing();
        for intent in self.router.route(event, &axis, is_playing) {
            self.apply_intent(intent, now);
        }
    }

    fn apply_intent(&mut self, intent: PlayerIntent, now: Instant) {
        match intent {
            PlayerIntent::Seek(time) => {
                self.controller.seek(time);
                self.needs_redraw = true;
            }
            PlayerIntent::ToggleTransport => {
                self.controller.toggle_play_pause();
                self.needs_redraw = true;
            }
            PlayerIntent::StepTrack(step) => {
                let from = self
                    .controller
                    .current_index()
                    .map(|i| i as isize)
                    .unwrap_or(-1);
                let requested = from + step;
                if requested >= 0 {
                    if let Some(request) = self.controller.switch_track(requested as usize) {
                        debug!(index = request.index, "navigating to track");
                        self.supervisor.begin(request);
                        self.needs_redraw = true;
                    }
                }
            }
            PlayerIntent::Activity => {
                self.overlay.activity(now);
            }
        }
    }

    /// The surface changed size; remap and repaint.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.needs_redraw = true;
    }

    /// One host frame: drain finished loads, advance the clock, run the
    /// overlay debounce, and repaint if playing or dirty.
    pub fn on_frame(&mut self, now: Instant, surface: &mut dyn RenderSurface) {
        while let Some(outcome) = self.supervisor.try_next() {
            if self.controller.apply_decode(outcome) {
                self.needs_redraw = true;
            }
        }

        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        let was_playing = self.controller.is_playing();
        if was_playing {
            self.controller.advance(dt);
            if !self.controller.is_playing() {
                // Reached the end of the track: paint the final position.
                self.needs_redraw = true;
            }
        }

        self.overlay.tick(now);

        if self.controller.is_playing() || self.needs_redraw {
            let axis = self.axis();
            let session = self.controller.session();
            self.renderer.draw(
                surface,
                self.controller.envelope(),
                &axis,
                &session,
                self.router.drag_x(),
            );
            self.needs_redraw = false;
        }
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn renderer_mut(&mut self) -> &mut WaveformRenderer {
        &mut self.renderer
    }

    /// Tear the session down: cancel any in-flight load and the overlay
    /// timer. Also runs on drop via the supervisor.
    pub fn shutdown(&mut self) {
        self.supervisor.shutdown();
        self.overlay.cancel();
    }

    /// Last known surface dimensions, as set at construction or [`resize`].
    ///
    /// [`resize`]: PlayerSession::resize
    pub fn surface_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}
