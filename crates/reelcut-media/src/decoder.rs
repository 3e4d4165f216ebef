//! Clip decoder: spawned FFmpeg piping rawvideo RGBA frames.
//!
//! Each clip gets its own decoder process. FFmpeg resamples to the
//! output frame rate (`fps` filter), so every delivered frame advances
//! the clip's elapsed time by exactly one output frame interval. The
//! clip's own audio is always dropped (`-an`).

use crate::ffmpeg::ffmpeg_path;
use crate::probe::MediaProbe;
use reelcut_core::{FrameBuffer, FrameRate, ReelcutError, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::{debug, info};

/// One decoded frame together with its elapsed time in the clip.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub buffer: FrameBuffer,
    /// Elapsed clip time in output frames (0-based delivery index)
    pub index: i64,
}

/// A running decoder for one clip.
pub struct ClipDecoder {
    child: Child,
    stdout: Option<ChildStdout>,
    width: u32,
    height: u32,
    frame_len: usize,
    frames_delivered: i64,
    path: String,
}

impl ClipDecoder {
    /// Probe the clip and spawn its decoder process.
    ///
    /// Ready-to-play means the process is up and the pipe is open;
    /// frames are pulled on demand by `next_frame`.
    pub fn open<P: AsRef<Path>>(path: P, output_rate: FrameRate) -> Result<Self> {
        let path = path.as_ref();
        let probe = MediaProbe::probe(path)
            .map_err(|e| ReelcutError::ClipLoad(format!("probe failed: {e}")))?;
        let video = probe.primary_video().ok_or_else(|| {
            ReelcutError::ClipLoad(format!("'{}' has no video stream", path.display()))
        })?;
        let (width, height) = (video.width, video.height);

        let mut child = Command::new(ffmpeg_path())
            .args(decode_args(&path.to_string_lossy(), output_rate))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ReelcutError::ClipLoad(format!("failed to spawn ffmpeg: {e}")))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ReelcutError::ClipLoad("failed to open ffmpeg stdout".into())
        })?;

        info!(path = %path.display(), width, height, "clip decoder started");

        Ok(Self {
            child,
            stdout: Some(stdout),
            width,
            height,
            frame_len: FrameBuffer::byte_len(width, height),
            frames_delivered: 0,
            path: path.to_string_lossy().into_owned(),
        })
    }

    /// Native dimensions of the clip.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Read the next frame, `None` once the clip's content ends.
    pub fn next_frame(&mut self) -> Result<Option<DecodedFrame>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut data = vec![0u8; self.frame_len];
        let mut filled = 0usize;
        while filled < self.frame_len {
            match stdout.read(&mut data[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(ReelcutError::ClipLoad(format!(
                        "read error from decoder for '{}': {e}",
                        self.path
                    )))
                }
            }
        }

        if filled == 0 {
            // Clean end of stream
            self.stdout = None;
            debug!(path = %self.path, frames = self.frames_delivered, "clip decoder drained");
            return Ok(None);
        }
        if filled < self.frame_len {
            return Err(ReelcutError::ClipLoad(format!(
                "truncated frame from decoder for '{}' ({filled} of {} bytes)",
                self.path, self.frame_len
            )));
        }

        let buffer = FrameBuffer::from_data(self.width, self.height, data)
            .ok_or_else(|| ReelcutError::ClipLoad("frame size mismatch".into()))?;
        let index = self.frames_delivered;
        self.frames_delivered += 1;
        Ok(Some(DecodedFrame { buffer, index }))
    }
}

impl Drop for ClipDecoder {
    fn drop(&mut self) {
        // Release the process unconditionally; the pipe may still be open
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// FFmpeg argument list for decoding a clip to rawvideo RGBA at the
/// output frame rate, with its embedded audio dropped.
fn decode_args(path: &str, output_rate: FrameRate) -> Vec<String> {
    vec![
        "-v".into(),
        "error".into(),
        "-i".into(),
        path.into(),
        "-an".into(),
        "-vf".into(),
        format!(
            "fps={}/{}",
            output_rate.numerator, output_rate.denominator
        ),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "pipe:1".into(),
    ]
}
