//! # Playback Module
//!
//! Audio decode, peak-envelope extraction, and the transport state machine
//! behind the waveform scrubber.
//!
//! ## Overview
//!
//! This module handles:
//! - One-shot audio decoding to a single-channel sample buffer (symphonia)
//! - Downsampling the buffer into a fixed-length peak envelope for display
//! - Transport state (current track, position, playing/paused) and
//!   track-switch logic that skips non-playable entries
//! - Generation-guarded asynchronous track loading, so a superseded decode
//!   can never clobber the state of a newer track switch
//!
//! ## Load pipeline
//!
//! ```text
//! switch_track ──> LoadRequest{index, generation}
//!                      │ LoadSupervisor (async fetch + blocking decode)
//!                      ▼
//!               LoadOutcome{generation, ...} ──> apply_decode
//!                      (stale generation ⇒ discarded, never applied)
//! ```

pub mod controller;
pub mod decoder;
pub mod envelope;
pub mod error;
pub mod supervisor;

pub use controller::{LoadRequest, PlaybackController, PlaybackSession, PlayerState};
pub use decoder::{decode_first_channel, DecodedAudio};
pub use envelope::{EnvelopeBin, WaveformEnvelope, DEFAULT_ENVELOPE_BINS};
pub use error::{PlaybackError, Result};
pub use supervisor::{LoadOutcome, LoadSupervisor, LoadedTrack, TrackFetcher};
