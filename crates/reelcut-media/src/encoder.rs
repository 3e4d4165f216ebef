//! Encoder sink: a spawned FFmpeg process muxing composed video and
//! mixed audio into an MP4 container.
//!
//! Codec selection happens at construction, before any frame is drawn:
//! hardware H.264 when requested and available, else libx264, else a
//! `CodecUnavailable` error. Video frames stream in as rawvideo RGBA on
//! stdin; the pre-mixed PCM rides along as an f32le side input. The
//! container bytes are only handed out by `finish`.

use crate::ffmpeg::{ffmpeg_available, ffmpeg_path};
use reelcut_core::{CodecPreference, FrameBuffer, ReelcutError, RenderTarget, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Hardware H.264 encoders in preference order, across platforms.
const HARDWARE_H264: [&str; 4] = ["h264_videotoolbox", "h264_nvenc", "h264_qsv", "h264_vaapi"];

/// The software fallback.
const SOFTWARE_H264: &str = "libx264";

struct RunningEncode {
    child: Child,
    stdin: Option<ChildStdin>,
    /// Drains stderr concurrently so ffmpeg can never block on a full
    /// pipe and stop reading frames
    stderr: JoinHandle<Vec<u8>>,
    staging: TempDir,
    out_path: PathBuf,
    frames_written: u64,
}

/// FFmpeg-backed encoder sink for one render.
pub struct FfmpegSink {
    target: RenderTarget,
    encoder: String,
    running: Option<RunningEncode>,
}

impl FfmpegSink {
    /// Select a codec for the target and prepare the sink.
    ///
    /// Fails with `CodecUnavailable` before any frame is drawn if
    /// neither the preferred hardware encoder nor libx264 exists.
    pub fn new(target: RenderTarget) -> Result<Self> {
        if !ffmpeg_available() {
            return Err(ReelcutError::CodecUnavailable(
                "ffmpeg binary not found; no encoder available".into(),
            ));
        }

        let listing = encoder_listing()?;
        let encoder = select_encoder(target.codec_preference, &listing)?;
        info!(encoder, "encoder selected");

        Ok(Self {
            target,
            encoder: encoder.to_string(),
            running: None,
        })
    }

    /// The selected FFmpeg encoder name.
    pub fn encoder_name(&self) -> &str {
        &self.encoder
    }

    /// Spawn the encoder process. `pcm` is the fully mixed background
    /// audio (interleaved stereo f32 at the target sample rate), fixed
    /// before the first video frame.
    pub fn start(&mut self, pcm: Option<&[f32]>) -> Result<()> {
        if self.running.is_some() {
            return Err(ReelcutError::Encoder("encoder already started".into()));
        }

        let staging = TempDir::new()
            .map_err(|e| ReelcutError::Encoder(format!("failed to create staging dir: {e}")))?;
        let out_path = staging.path().join("output.mp4");

        let pcm_path = match pcm {
            Some(samples) => {
                let path = staging.path().join("bgm.f32le");
                write_pcm(&path, samples)?;
                Some(path)
            }
            None => None,
        };

        let args = encode_args(&self.target, &self.encoder, pcm_path.as_deref(), &out_path);
        debug!(?args, "spawning encoder");

        let mut child = Command::new(ffmpeg_path())
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelcutError::Encoder(format!("failed to spawn ffmpeg: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelcutError::Encoder("failed to open ffmpeg stdin".into()))?;
        let stderr = child.stderr.take();
        let stderr = std::thread::Builder::new()
            .name("reelcut-encoder-log".into())
            .spawn(move || match stderr {
                Some(pipe) => drain(pipe),
                None => Vec::new(),
            })
            .map_err(|e| ReelcutError::Encoder(format!("failed to spawn stderr reader: {e}")))?;

        self.running = Some(RunningEncode {
            child,
            stdin: Some(stdin),
            stderr,
            staging,
            out_path,
            frames_written: 0,
        });
        Ok(())
    }

    /// Stream one composed frame into the container.
    pub fn write_frame(&mut self, frame: &FrameBuffer) -> Result<()> {
        let run = self
            .running
            .as_mut()
            .ok_or_else(|| ReelcutError::Encoder("encoder not started".into()))?;

        if frame.width != self.target.width || frame.height != self.target.height {
            return Err(ReelcutError::Encoder(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.target.width, self.target.height
            )));
        }

        let stdin = run
            .stdin
            .as_mut()
            .ok_or_else(|| ReelcutError::Encoder("encoder already finalized".into()))?;
        stdin
            .write_all(&frame.data)
            .map_err(|e| ReelcutError::Encoder(format!("failed to write frame: {e}")))?;
        run.frames_written += 1;
        Ok(())
    }

    /// Flush, wait for the muxer, and return the container bytes.
    ///
    /// This is the only point at which the output is complete and valid.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let mut run = self
            .running
            .take()
            .ok_or_else(|| ReelcutError::Encoder("encoder not started".into()))?;

        // Close stdin to signal end-of-stream
        drop(run.stdin.take());

        let status = run
            .child
            .wait()
            .map_err(|e| ReelcutError::Encoder(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr = run.stderr.join().unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(ReelcutError::Encoder(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }

        let bytes = std::fs::read(&run.out_path)
            .map_err(|e| ReelcutError::Encoder(format!("failed to read container: {e}")))?;
        info!(
            frames = run.frames_written,
            bytes = bytes.len(),
            "encode finalized"
        );
        Ok(bytes)
    }

    /// Kill the encoder and discard everything buffered so far.
    pub fn abort(&mut self) {
        if let Some(mut run) = self.running.take() {
            drop(run.stdin.take());
            let _ = run.child.kill();
            let _ = run.child.wait();
            // The kill closed the pipe, so the drainer thread finishes
            let _ = run.stderr.join();
            warn!(frames = run.frames_written, "encode aborted, output discarded");
            // Staging dir (and any partial container) is removed here
            drop(run.staging);
        }
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        // Resource release is unconditional on every exit path
        self.abort();
    }
}

/// Query the `ffmpeg -encoders` listing once.
fn encoder_listing() -> Result<String> {
    let output = Command::new(ffmpeg_path())
        .args(["-hide_banner", "-encoders"])
        .output()
        .map_err(|e| ReelcutError::CodecUnavailable(format!("failed to list encoders: {e}")))?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Pick the encoder for a preference against an `-encoders` listing.
fn select_encoder(preference: CodecPreference, listing: &str) -> Result<&'static str> {
    let has = |name: &str| listing.lines().any(|l| l.split_whitespace().any(|w| w == name));

    if preference == CodecPreference::Hardware {
        if let Some(hw) = HARDWARE_H264.iter().find(|name| has(name)) {
            return Ok(hw);
        }
    }
    if has(SOFTWARE_H264) {
        return Ok(SOFTWARE_H264);
    }
    Err(ReelcutError::CodecUnavailable(
        "no H.264 encoder (hardware or libx264) in this ffmpeg build".into(),
    ))
}

/// Build the FFmpeg command arguments for one encode.
fn encode_args(
    target: &RenderTarget,
    encoder: &str,
    pcm: Option<&Path>,
    out: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        // Input 0: composed video on stdin
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgba".into(),
        "-video_size".into(),
        format!("{}x{}", target.width, target.height),
        "-framerate".into(),
        format!(
            "{}/{}",
            target.frame_rate.numerator, target.frame_rate.denominator
        ),
        "-i".into(),
        "pipe:0".into(),
    ];

    // Input 1: pre-mixed background audio
    if let Some(pcm_path) = pcm {
        args.extend_from_slice(&[
            "-f".into(),
            "f32le".into(),
            "-ar".into(),
            target.audio_sample_rate.to_string(),
            "-ac".into(),
            "2".into(),
            "-i".into(),
            pcm_path.to_string_lossy().into_owned(),
        ]);
    }

    args.extend_from_slice(&[
        "-c:v".into(),
        encoder.into(),
        "-b:v".into(),
        format!("{}k", target.video_bitrate_kbps),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-movflags".into(),
        "+faststart".into(),
    ]);

    if pcm.is_some() {
        args.extend_from_slice(&[
            "-c:a".into(),
            "aac".into(),
            "-b:a".into(),
            format!("{}k", target.audio_bitrate_kbps),
            "-shortest".into(),
        ]);
    } else {
        args.push("-an".into());
    }

    args.push(out.to_string_lossy().into_owned());
    args
}

/// Read a stream to the end, discarding nothing.
fn drain(mut reader: impl Read) -> Vec<u8> {
    let mut buf = Vec::new();
    let _ = reader.read_to_end(&mut buf);
    buf
}

/// Write PCM samples as raw little-endian f32.
fn write_pcm(path: &Path, samples: &[f32]) -> Result<()> {
    let mut file = std::io::BufWriter::new(
        std::fs::File::create(path)
            .map_err(|e| ReelcutError::Encoder(format!("failed to stage PCM: {e}")))?,
    );
    for sample in samples {
        file.write_all(&sample.to_le_bytes())
            .map_err(|e| ReelcutError::Encoder(format!("failed to stage PCM: {e}")))?;
    }
    file.flush()
        .map_err(|e| ReelcutError::Encoder(format!("failed to stage PCM: {e}")))?;
    Ok(())
}
