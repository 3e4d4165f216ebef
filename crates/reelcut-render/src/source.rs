//! The clip source resolver seam.
//!
//! A `ClipSource` turns a clip record into a playing handle; loading is
//! the slow I/O the prefetcher hides. Production resolves through the
//! FFmpeg decoder; tests substitute synthetic sources with controlled
//! latency.

use reelcut_core::{FrameBuffer, RenderTarget, Result};
use reelcut_media::ClipDecoder;
use reelcut_timeline::Clip;

/// A loaded, ready-to-play clip: a producer of decoded frames at the
/// output frame rate.
pub trait ClipHandle: Send + 'static {
    /// The next delivered frame, or `None` once the clip's natural
    /// content ends (which may be before the assigned cut elapses).
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>>;
}

/// Resolves a clip record to a decodable handle.
pub trait ClipSource: Send + Sync + 'static {
    type Handle: ClipHandle;

    /// Open the clip's byte source and make it ready to play. This is
    /// the comparatively slow operation the double buffer overlaps with
    /// playback of the previous clip.
    fn load(&self, clip: &Clip, target: &RenderTarget) -> Result<Self::Handle>;
}

/// Production clip source backed by spawned FFmpeg decoders.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaClipSource;

impl ClipSource for MediaClipSource {
    type Handle = ClipDecoder;

    fn load(&self, clip: &Clip, target: &RenderTarget) -> Result<Self::Handle> {
        ClipDecoder::open(clip.source_path(), target.frame_rate)
    }
}

impl ClipHandle for ClipDecoder {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>> {
        Ok(ClipDecoder::next_frame(self)?.map(|decoded| decoded.buffer))
    }
}
