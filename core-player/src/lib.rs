//! # Player Module
//!
//! The interactive waveform scrubber: input interpretation, the windowed
//! time↔pixel mapping, raster waveform rendering, and the session lifecycle
//! object that ties them to the transport.
//!
//! ## Overview
//!
//! This module handles:
//! - [`gesture`]: raw pointer/touch/wheel/key events → transport intents,
//!   including horizontal-vs-vertical gesture disambiguation with axis lock
//! - [`view`]: the visible time window (full on desktop, a 30 s slice on
//!   constrained viewports) and the single mapping used both to draw and to
//!   interpret drag coordinates
//! - [`render`]: painting the peak envelope and playhead into any
//!   [`render::RenderSurface`]
//! - [`overlay`]: the inactivity-fade debounce for the contact affordance
//! - [`session`]: [`session::PlayerSession`], which owns all of the above
//!   plus the transport and load supervisor
//!
//! Everything here is synchronous and surface-agnostic; tests feed synthetic
//! event sequences and record draw calls, no live rendering needed.

pub mod gesture;
pub mod overlay;
pub mod render;
pub mod session;
pub mod view;

pub use gesture::{InputEvent, Key, PlayerIntent, ScrubGestureRouter};
pub use overlay::OverlayFade;
pub use render::{Color, DrawOp, RecordingSurface, RenderSurface, WaveformRenderer};
pub use session::{PlayerOptions, PlayerSession};
pub use view::{TimeAxis, ViewMode, MOBILE_VIEW_SECONDS};
