//! Media file probing to get metadata without a full decode.
//!
//! Shells out to ffprobe with JSON output and parses the result into
//! typed stream info.

use crate::ffmpeg::ffprobe_path;
use reelcut_core::{FrameRate, RationalTime, ReelcutError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Information about a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path
    pub path: String,
    /// Container duration
    pub duration: RationalTime,
    /// Video streams
    pub video_streams: Vec<VideoStreamInfo>,
    /// Audio streams
    pub audio_streams: Vec<AudioStreamInfo>,
    /// Container format
    pub format: String,
}

/// Information about a video stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
}

/// Information about an audio stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub codec: String,
    pub sample_rate: u32,
    pub channels: u16,
}

impl MediaProbe {
    /// Probe a media file.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReelcutError::Probe(format!(
                "file not found: {}",
                path.display()
            )));
        }

        let output = Command::new(ffprobe_path())
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| ReelcutError::Probe(format!("failed to run ffprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReelcutError::Probe(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                stderr.trim()
            )));
        }

        let json = String::from_utf8_lossy(&output.stdout);
        let probe = parse_probe_json(&json, &path.to_string_lossy())?;
        debug!(path = %path.display(), duration = %probe.duration, "probed media file");
        Ok(probe)
    }

    /// Check if the file has video.
    pub fn has_video(&self) -> bool {
        !self.video_streams.is_empty()
    }

    /// Check if the file has audio.
    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    /// Get the primary video stream info.
    pub fn primary_video(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }

    /// Get the primary audio stream info.
    pub fn primary_audio(&self) -> Option<&AudioStreamInfo> {
        self.audio_streams.first()
    }
}

// ── ffprobe JSON parsing ────────────────────────────────────────

#[derive(Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    format_name: Option<String>,
}

#[derive(Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u16>,
}

/// Parse ffprobe's `-print_format json` output.
pub(crate) fn parse_probe_json(json: &str, path: &str) -> Result<MediaProbe> {
    let raw: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| ReelcutError::Probe(format!("invalid ffprobe output: {e}")))?;

    let (duration, format) = match raw.format {
        Some(f) => {
            let secs = f
                .duration
                .as_deref()
                .and_then(|d| d.parse::<f64>().ok())
                .unwrap_or(0.0);
            (
                RationalTime::from_seconds_f64(secs),
                f.format_name.unwrap_or_default(),
            )
        }
        None => (RationalTime::ZERO, String::new()),
    };

    let mut video_streams = Vec::new();
    let mut audio_streams = Vec::new();

    for stream in raw.streams {
        match stream.codec_type.as_deref() {
            Some("video") => {
                let (width, height) = match (stream.width, stream.height) {
                    (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
                    _ => continue,
                };
                video_streams.push(VideoStreamInfo {
                    codec: stream.codec_name.unwrap_or_default(),
                    width,
                    height,
                    frame_rate: stream
                        .r_frame_rate
                        .as_deref()
                        .and_then(parse_frame_rate)
                        .unwrap_or_default(),
                });
            }
            Some("audio") => {
                audio_streams.push(AudioStreamInfo {
                    codec: stream.codec_name.unwrap_or_default(),
                    sample_rate: stream
                        .sample_rate
                        .as_deref()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0),
                    channels: stream.channels.unwrap_or(0),
                });
            }
            _ => {}
        }
    }

    if video_streams.is_empty() && audio_streams.is_empty() {
        return Err(ReelcutError::Probe(format!(
            "no decodable streams in '{path}'"
        )));
    }

    Ok(MediaProbe {
        path: path.to_string(),
        duration,
        video_streams,
        audio_streams,
        format,
    })
}

/// Parse an ffprobe rate string like `"30000/1001"` or `"60/1"`.
fn parse_frame_rate(s: &str) -> Option<FrameRate> {
    let (num, den) = s.split_once('/')?;
    let num: u32 = num.parse().ok()?;
    let den: u32 = den.parse().ok()?;
    if num == 0 || den == 0 {
        return None;
    }
    Some(FrameRate::new(num, den))
}
