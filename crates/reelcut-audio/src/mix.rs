//! Mixdown of the decoded background track to the output duration.

use crate::envelope::FadeEnvelope;
use reelcut_core::RationalTime;
use tracing::debug;

/// The fully mixed background audio for one render: interleaved stereo
/// f32 samples spanning exactly the output duration.
#[derive(Debug, Clone)]
pub struct MixedAudio {
    /// Interleaved samples, `frame_count() * channels` long
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count (always 2 for the encoder side input)
    pub channels: u16,
}

impl MixedAudio {
    /// Number of sample frames (per-channel samples).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }
}

/// Shape a decoded track to the output.
///
/// Applies the fade envelope over the full output duration, truncating
/// a longer track and padding a shorter one with silence. The source is
/// interleaved stereo at `sample_rate`; the result always spans exactly
/// `total` seconds.
pub fn mix_background(
    source: &[f32],
    sample_rate: u32,
    channels: u16,
    total: RationalTime,
) -> MixedAudio {
    let total_secs = total.to_seconds_f64();
    let out_frames = (total_secs * sample_rate as f64).round() as usize;
    let ch = channels as usize;
    let env = FadeEnvelope::for_duration(total_secs);

    let mut samples = vec![0.0f32; out_frames * ch];
    let src_frames = source.len() / ch;
    let copy_frames = src_frames.min(out_frames);

    for frame in 0..copy_frames {
        let t = frame as f64 / sample_rate as f64;
        let gain = env.gain(t) as f32;
        for c in 0..ch {
            samples[frame * ch + c] = source[frame * ch + c] * gain;
        }
    }

    debug!(
        source_frames = src_frames,
        output_frames = out_frames,
        "mixed background track"
    );

    MixedAudio {
        samples,
        sample_rate,
        channels,
    }
}
