//! Reelcut Render - The composition and render pipeline
//!
//! Coordinates two independently-clocked media paths into one muxed
//! output: video frames are pulled clip by clip through a double-
//! buffered prefetcher and composed onto a fixed canvas, while the
//! background audio is fully mixed before the first frame so clip-
//! switch stalls can never touch it.
//!
//! - `ClipSource` / `ClipHandle`: the clip source resolver seam
//! - `Prefetcher`: owned two-slot double buffer hiding load I/O
//! - `Compositor`: contain-fit painting onto the fixed canvas
//! - `EncoderSink`: the stream-encoding seam (`FfmpegSink` in
//!   production, `CollectingSink` in memory)
//! - `Pipeline`: the controller state machine with progress,
//!   cancellation, and unconditional teardown

pub mod cancel;
pub mod compositor;
pub mod pipeline;
pub mod prefetch;
pub mod sink;
pub mod source;

pub use cancel::CancelHandle;
pub use compositor::Compositor;
pub use pipeline::{
    prepare_background, AudioTrack, Pipeline, PipelineState, RenderProgress, RenderRequest,
};
pub use prefetch::Prefetcher;
pub use sink::{CollectingSink, EncoderSink, SinkStats};
pub use source::{ClipHandle, ClipSource, MediaClipSource};
