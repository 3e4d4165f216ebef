//! The encoder sink seam.
//!
//! The pipeline streams composed frames into a sink and only receives
//! the finished container bytes at finalization. Production uses the
//! FFmpeg-backed `FfmpegSink`; `CollectingSink` records the stream in
//! memory for tests and tooling.

use reelcut_audio::MixedAudio;
use reelcut_core::{FrameBuffer, Result};
use reelcut_media::FfmpegSink;
use std::sync::{Arc, Mutex};

/// Consumes the composed video stream and the mixed audio as one
/// logical output.
pub trait EncoderSink {
    /// Begin the encode. `audio` is the fully mixed background track,
    /// fixed before the first frame; `None` renders a silent output.
    fn start(&mut self, audio: Option<&MixedAudio>) -> Result<()>;

    /// Stream one composed frame.
    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<()>;

    /// Flush and return the complete container bytes. The sole point at
    /// which the output may be assumed valid.
    fn finish(self) -> Result<Vec<u8>>
    where
        Self: Sized;

    /// Abort the encode, discarding buffered output.
    fn abort(&mut self);
}

impl EncoderSink for FfmpegSink {
    fn start(&mut self, audio: Option<&MixedAudio>) -> Result<()> {
        FfmpegSink::start(self, audio.map(|mixed| mixed.samples.as_slice()))
    }

    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<()> {
        FfmpegSink::write_frame(self, frame)
    }

    fn finish(self) -> Result<Vec<u8>> {
        FfmpegSink::finish(self)
    }

    fn abort(&mut self) {
        FfmpegSink::abort(self)
    }
}

/// What a `CollectingSink` observed, shared with the owner of the
/// stats handle.
#[derive(Debug, Default)]
pub struct SinkStats {
    pub started: bool,
    pub frames_written: u64,
    pub finished: bool,
    pub aborted: bool,
    /// Copy of the mixed audio handed to `start`, if any
    pub audio: Option<MixedAudio>,
    /// First and last composed frames, for pixel assertions
    pub first_frame: Option<FrameBuffer>,
    pub last_frame: Option<FrameBuffer>,
}

/// In-memory sink that records the stream instead of encoding it.
#[derive(Debug, Default)]
pub struct CollectingSink {
    stats: Arc<Mutex<SinkStats>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for inspecting the stream after the render returns.
    pub fn stats(&self) -> Arc<Mutex<SinkStats>> {
        Arc::clone(&self.stats)
    }
}

impl EncoderSink for CollectingSink {
    fn start(&mut self, audio: Option<&MixedAudio>) -> Result<()> {
        let mut stats = self.stats.lock().unwrap();
        stats.started = true;
        stats.audio = audio.cloned();
        Ok(())
    }

    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<()> {
        let mut stats = self.stats.lock().unwrap();
        if stats.first_frame.is_none() {
            stats.first_frame = Some(frame.clone());
        }
        stats.last_frame = Some(frame.clone());
        stats.frames_written += 1;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut stats = self.stats.lock().unwrap();
        stats.finished = true;
        // Stand-in container payload
        Ok(format!("frames:{}", stats.frames_written).into_bytes())
    }

    fn abort(&mut self) {
        self.stats.lock().unwrap().aborted = true;
    }
}
