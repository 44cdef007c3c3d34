//! # Peak Envelope Extraction
//!
//! Downsamples a decoded sample buffer into a fixed number of min/max peak
//! pairs for compact waveform drawing. Peaks — not RMS — so transient spikes
//! survive the reduction.

use tracing::trace;

/// Default number of envelope bins per track.
pub const DEFAULT_ENVELOPE_BINS: usize = 1000;

/// Peak pair for one equal-width block of the sample buffer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnvelopeBin {
    /// Maximum positive sample in the block, in `[0, 1]`.
    pub positive: f32,
    /// Most negative sample in the block, in `[-1, 0]`.
    pub negative: f32,
}

/// Fixed-length peak envelope of one track.
///
/// Computed once per track load, immutable afterwards, replaced wholesale on
/// track switch.
///
/// # Examples
///
/// ```
/// use core_playback::WaveformEnvelope;
///
/// let samples = vec![0.5, -0.25, 0.0, 0.0, -1.0, 1.0];
/// let envelope = WaveformEnvelope::from_samples(&samples, 3);
/// assert_eq!(envelope.len(), 3);
/// assert_eq!(envelope.bins()[0].positive, 0.5);
/// assert_eq!(envelope.bins()[0].negative, -0.25);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaveformEnvelope {
    bins: Vec<EnvelopeBin>,
}

impl WaveformEnvelope {
    /// Partition `samples` into `bins` equal-size contiguous blocks
    /// (`block = floor(len / bins)`, trailing remainder dropped) and take
    /// the positive and negative peak of each block.
    ///
    /// Returns an empty envelope when the buffer holds fewer samples than
    /// bins (there is nothing meaningful to draw at that resolution).
    pub fn from_samples(samples: &[f32], bins: usize) -> Self {
        if bins == 0 {
            return Self::default();
        }
        let block = samples.len() / bins;
        if block == 0 {
            return Self::default();
        }

        let mut out = Vec::with_capacity(bins);
        for i in 0..bins {
            let mut positive = 0.0f32;
            let mut negative = 0.0f32;
            for &v in &samples[i * block..(i + 1) * block] {
                if v > positive {
                    positive = v;
                }
                if v < negative {
                    negative = v;
                }
            }
            out.push(EnvelopeBin { positive, negative });
        }
        trace!(bins, block, "envelope extracted");
        Self { bins: out }
    }

    pub fn bins(&self) -> &[EnvelopeBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
