//! FFmpeg binary resolution and availability checks.

use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Path to the ffmpeg binary (sidecar-managed or on PATH).
pub fn ffmpeg_path() -> PathBuf {
    ffmpeg_sidecar::paths::ffmpeg_path()
}

/// Path to the ffprobe binary next to ffmpeg.
pub fn ffprobe_path() -> PathBuf {
    let name = if cfg!(windows) { "ffprobe.exe" } else { "ffprobe" };
    ffmpeg_path().with_file_name(name)
}

/// Check whether ffmpeg can actually be spawned.
pub fn ffmpeg_available() -> bool {
    Command::new(ffmpeg_path())
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
