//! Full up-front decode of the background track to PCM.
//!
//! The track is decoded exactly once, before playback begins. A failure
//! here aborts the render; it never silently falls back to a track-less
//! output, since the caller explicitly asked for background audio.

use crate::ffmpeg::ffmpeg_path;
use reelcut_core::{ReelcutError, Result};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Decode an audio file completely to interleaved stereo f32 samples at
/// the given sample rate.
pub fn decode_background_track<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Vec<f32>> {
    let path = path.as_ref();

    let output = Command::new(ffmpeg_path())
        .args([
            "-v",
            "error",
            "-i",
            &path.to_string_lossy(),
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelcutError::AudioDecode(format!("failed to spawn ffmpeg: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReelcutError::AudioDecode(format!(
            "ffmpeg failed for '{}': {}",
            path.display(),
            stderr.trim()
        )));
    }

    let samples = bytes_to_samples(&output.stdout)?;
    if samples.is_empty() {
        return Err(ReelcutError::AudioDecode(format!(
            "'{}' produced no audio samples",
            path.display()
        )));
    }

    info!(
        path = %path.display(),
        frames = samples.len() / 2,
        sample_rate,
        "background track decoded"
    );
    Ok(samples)
}

/// Reinterpret little-endian f32 bytes as samples.
fn bytes_to_samples(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(ReelcutError::AudioDecode(format!(
            "PCM stream length {} is not sample-aligned",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}
