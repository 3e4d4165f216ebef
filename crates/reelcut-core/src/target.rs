//! Render target configuration.
//!
//! The output geometry is fixed per render: one resolution, one frame
//! rate, one bitrate tier. Nothing here is negotiated at runtime beyond
//! the hardware/software codec preference.

use crate::time::FrameRate;
use serde::{Deserialize, Serialize};

/// Preferred codec family for the encoder sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CodecPreference {
    /// Use a hardware-accelerated H.264 encoder when one is available,
    /// falling back to software.
    #[default]
    Hardware,
    /// Always use the software encoder.
    Software,
}

/// Fixed output configuration for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTarget {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Output frame rate
    pub frame_rate: FrameRate,
    /// Video bitrate in kbps, fixed high enough to avoid visible
    /// artifacts at the target resolution and frame rate
    pub video_bitrate_kbps: u32,
    /// Audio bitrate in kbps
    pub audio_bitrate_kbps: u32,
    /// Audio sample rate for the mixed background track
    pub audio_sample_rate: u32,
    /// Hardware vs software codec preference
    pub codec_preference: CodecPreference,
}

impl RenderTarget {
    /// Vertical 9:16 preset, 1080x1920 at 60 fps.
    pub fn vertical_1080p60() -> Self {
        Self {
            width: 1080,
            height: 1920,
            frame_rate: FrameRate::FPS_60,
            video_bitrate_kbps: 12_000,
            audio_bitrate_kbps: 192,
            audio_sample_rate: 48_000,
            codec_preference: CodecPreference::Hardware,
        }
    }

    /// Same preset pinned to the software encoder.
    pub fn with_software_codec(mut self) -> Self {
        self.codec_preference = CodecPreference::Software;
        self
    }

    /// Byte length of one rawvideo RGBA frame at this target size.
    pub fn frame_byte_len(&self) -> usize {
        crate::frame::FrameBuffer::byte_len(self.width, self.height)
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::vertical_1080p60()
    }
}
