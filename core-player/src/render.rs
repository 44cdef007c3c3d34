//! # Waveform Renderer
//!
//! Paints the peak envelope and playhead into a raster surface. The renderer
//! only knows how to draw into the [`RenderSurface`] trait; hosts back it
//! with a real canvas, tests with a [`RecordingSurface`].
//!
//! While a track plays the host redraws every animation frame; while paused
//! it redraws once after each discrete change (resize, switch, seek, drag),
//! so an idle player burns no CPU.

use core_playback::{PlaybackSession, WaveformEnvelope};

use crate::view::TimeAxis;

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BACKGROUND: Color = Color(0x11, 0x11, 0x11);
    pub const WAVE: Color = Color(0x33, 0x33, 0x33);
    pub const PLAYHEAD: Color = Color(0x11, 0x11, 0x11);
}

/// Minimal drawing surface: a cleared rectangle plus stroked lines is all the
/// waveform needs.
pub trait RenderSurface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self, color: Color);
    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, stroke_width: f32);
}

/// One recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        stroke_width: f32,
    },
}

/// A surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Recorded lines drawn in the given color.
    pub fn lines_with_color(&self, color: Color) -> Vec<DrawOp> {
        self.ops
            .iter()
            .copied()
            .filter(|op| matches!(op, DrawOp::Line { color: c, .. } if *c == color))
            .collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self, color: Color) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear(color));
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color, stroke_width: f32) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            stroke_width,
        });
    }
}

/// Paints envelope strokes and the playhead.
#[derive(Debug, Clone)]
pub struct WaveformRenderer {
    pub background: Color,
    pub wave_color: Color,
    pub wave_stroke_width: f32,
    pub playhead_color: Color,
    pub playhead_width: f32,
}

impl Default for WaveformRenderer {
    fn default() -> Self {
        Self {
            background: Color::BACKGROUND,
            wave_color: Color::WAVE,
            wave_stroke_width: 1.0,
            playhead_color: Color::PLAYHEAD,
            playhead_width: 0.5,
        }
    }
}

impl WaveformRenderer {
    /// Draw one frame.
    ///
    /// Only the envelope bins inside the axis window are drawn, mapped
    /// proportionally to pixel columns; each bin becomes two vertical strokes
    /// from the mid-line, scaled by its peaks times half the surface height.
    /// The playhead lands on the drag position while a drag is active, else
    /// on the mapped playback position.
    pub fn draw(
        &self,
        surface: &mut dyn RenderSurface,
        envelope: Option<&WaveformEnvelope>,
        axis: &TimeAxis,
        session: &PlaybackSession,
        drag_x: Option<f32>,
    ) {
        surface.clear(self.background);

        let Some(envelope) = envelope.filter(|e| !e.is_empty()) else {
            return;
        };
        if session.duration <= 0.0 {
            return;
        }

        let width = surface.width();
        let height = surface.height();
        let mid = height / 2.0;

        let bins = envelope.bins();
        let total = bins.len();
        let start_idx = (((axis.window_start / session.duration) * total as f64).floor() as usize)
            .min(total.saturating_sub(1));
        let end_idx = (((axis.window_end / session.duration) * total as f64).ceil() as usize)
            .min(total.saturating_sub(1));
        let slice_len = end_idx.saturating_sub(start_idx).max(1);

        let column = width / slice_len as f32;
        for i in 0..slice_len {
            let bin = bins[start_idx + i];
            let x = i as f32 * column;
            surface.line(
                (x, mid),
                (x, mid - bin.positive * mid),
                self.wave_color,
                self.wave_stroke_width,
            );
            surface.line(
                (x, mid),
                (x, mid - bin.negative * mid),
                self.wave_color,
                self.wave_stroke_width,
            );
        }

        let playhead_x = drag_x.unwrap_or_else(|| axis.time_to_x(session.position));
        surface.line(
            (playhead_x, 0.0),
            (playhead_x, height),
            self.playhead_color,
            self.playhead_width,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewMode;

    fn session(duration: f64, position: f64) -> PlaybackSession {
        PlaybackSession {
            current_index: Some(0),
            duration,
            position,
            is_playing: false,
        }
    }

    fn envelope_of(bins: usize) -> WaveformEnvelope {
        // One sample per bin at 0.5 / -0.5.
        let samples: Vec<f32> = (0..bins * 2)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        WaveformEnvelope::from_samples(&samples, bins)
    }

    #[test]
    fn empty_envelope_clears_and_draws_nothing() {
        let renderer = WaveformRenderer::default();
        let mut surface = RecordingSurface::new(800.0, 400.0);
        let axis = TimeAxis::compute(ViewMode::Full, 0.0, 0.0, 800.0);
        renderer.draw(&mut surface, None, &axis, &session(0.0, 0.0), None);
        assert_eq!(surface.ops, vec![DrawOp::Clear(Color::BACKGROUND)]);
    }

    #[test]
    fn full_view_draws_two_strokes_per_bin_plus_playhead() {
        let renderer = WaveformRenderer::default();
        let mut surface = RecordingSurface::new(800.0, 400.0);
        let envelope = envelope_of(100);
        let axis = TimeAxis::compute(ViewMode::Full, 100.0, 0.0, 800.0);
        renderer.draw(
            &mut surface,
            Some(&envelope),
            &axis,
            &session(100.0, 0.0),
            None,
        );

        let wave_lines = surface.lines_with_color(Color::WAVE);
        // Full window: indices 0..=99, slice_len 99, two strokes each.
        assert_eq!(wave_lines.len(), 99 * 2);
        let playhead = surface.lines_with_color(Color::PLAYHEAD);
        assert_eq!(playhead.len(), 1);
    }

    #[test]
    fn strokes_extend_from_midline_scaled_by_peaks() {
        let renderer = WaveformRenderer::default();
        let mut surface = RecordingSurface::new(100.0, 400.0);
        let envelope = envelope_of(10);
        let axis = TimeAxis::compute(ViewMode::Full, 10.0, 0.0, 100.0);
        renderer.draw(
            &mut surface,
            Some(&envelope),
            &axis,
            &session(10.0, 0.0),
            None,
        );

        let mid = 200.0;
        for op in surface.lines_with_color(Color::WAVE) {
            let DrawOp::Line { from, to, .. } = op else {
                continue;
            };
            assert_eq!(from.1, mid);
            // 0.5 peak over a 200 px half-height: 100 px excursion either way.
            assert!(
                (to.1 - 100.0).abs() < 1e-3 || (to.1 - 300.0).abs() < 1e-3,
                "unexpected stroke end {to:?}"
            );
        }
    }

    #[test]
    fn windowed_view_draws_only_the_visible_slice() {
        let renderer = WaveformRenderer::default();
        let mut surface = RecordingSurface::new(800.0, 400.0);
        let envelope = envelope_of(1000);
        // 300 s track, 30 s window centered at 150 s: bins 450..=550.
        let axis = TimeAxis::compute(ViewMode::windowed(), 300.0, 150.0, 800.0);
        renderer.draw(
            &mut surface,
            Some(&envelope),
            &axis,
            &session(300.0, 150.0),
            None,
        );

        let wave_lines = surface.lines_with_color(Color::WAVE);
        // floor(135/300*1000)=450 .. ceil(165/300*1000)=550 → 100 columns.
        assert_eq!(wave_lines.len(), 100 * 2);
    }

    #[test]
    fn playhead_follows_drag_position_while_dragging() {
        let renderer = WaveformRenderer::default();
        let mut surface = RecordingSurface::new(800.0, 400.0);
        let envelope = envelope_of(100);
        let axis = TimeAxis::compute(ViewMode::Full, 100.0, 50.0, 800.0);
        renderer.draw(
            &mut surface,
            Some(&envelope),
            &axis,
            &session(100.0, 50.0),
            Some(123.0),
        );

        let playhead = surface.lines_with_color(Color::PLAYHEAD);
        assert!(
            matches!(playhead.as_slice(), [DrawOp::Line { from, .. }] if from.0 == 123.0)
        );
    }

    #[test]
    fn playhead_maps_position_when_not_dragging() {
        let renderer = WaveformRenderer::default();
        let mut surface = RecordingSurface::new(800.0, 400.0);
        let envelope = envelope_of(100);
        let axis = TimeAxis::compute(ViewMode::Full, 100.0, 25.0, 800.0);
        renderer.draw(
            &mut surface,
            Some(&envelope),
            &axis,
            &session(100.0, 25.0),
            None,
        );

        let playhead = surface.lines_with_color(Color::PLAYHEAD);
        assert!(
            matches!(playhead.as_slice(), [DrawOp::Line { from, .. }] if (from.0 - 200.0).abs() < 1e-3)
        );
    }
}
