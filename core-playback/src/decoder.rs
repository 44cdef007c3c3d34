//! # One-Shot Audio Decoder
//!
//! Decodes a complete in-memory audio payload to a single-channel PCM buffer
//! using Symphonia. This is the CPU-bound step behind every track switch; it
//! runs once per load and the result is immutable afterwards.

use std::io::Cursor;

use bytes::Bytes;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::error::{PlaybackError, Result};

/// Decoded single-channel audio.
///
/// Samples are the first channel only, normalized to `[-1.0, 1.0]`, at the
/// source sample rate. That is all the envelope extraction and the playback
/// clock need; full multi-channel PCM never leaves the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Source sample rate in Hz.
    pub sample_rate: u32,
    /// First-channel samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
}

impl DecodedAudio {
    /// Duration of the decoded buffer in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode an entire audio payload to its first channel.
///
/// The container is probed (no extension hint is required — protected media
/// arrives as opaque bytes), the first audio track with a known codec is
/// selected, and every packet is decoded. Corrupt packets are skipped, as the
/// demuxer can usually resynchronize; decoding only fails outright when the
/// payload cannot be probed or yields no samples at all.
///
/// # Errors
///
/// - [`PlaybackError::InvalidFormat`] when the container cannot be probed or
///   carries no sample rate
/// - [`PlaybackError::FormatNotDecodable`] when no decodable audio track
///   exists or nothing could be decoded
pub fn decode_first_channel(data: Bytes) -> Result<DecodedAudio> {
    let cursor = Cursor::new(data.to_vec());
    let media_source = Box::new(cursor) as Box<dyn MediaSource>;
    let stream = MediaSourceStream::new(media_source, Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlaybackError::InvalidFormat(format!("Failed to probe format: {e}")))?;

    let mut format_reader = probed.format;

    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            PlaybackError::FormatNotDecodable("No supported audio tracks".to_string())
        })?;
    let track_id = track.id;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| PlaybackError::InvalidFormat("Missing sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| {
            PlaybackError::FormatNotDecodable(format!("Failed to create codec decoder: {e}"))
        })?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            // End of the in-memory payload.
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(PlaybackError::DecodingError(format!(
                    "Failed to read packet: {e}"
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count().max(1);
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::<f32>::new(decoded.capacity() as u64, spec)
                });
                buf.copy_interleaved_ref(decoded);
                samples.extend(buf.samples().iter().step_by(channels));
            }
            Err(SymphoniaError::DecodeError(e)) => {
                // Recoverable: drop the packet and let the demuxer resync.
                warn!("skipping undecodable packet: {e}");
                continue;
            }
            Err(e) => {
                return Err(PlaybackError::DecodingError(format!(
                    "Decoder failed: {e}"
                )))
            }
        }
    }

    if samples.is_empty() {
        return Err(PlaybackError::FormatNotDecodable(
            "Payload produced no samples".to_string(),
        ));
    }

    debug!(
        sample_rate,
        samples = samples.len(),
        "decoded track payload"
    );

    Ok(DecodedAudio {
        sample_rate,
        samples,
    })
}
