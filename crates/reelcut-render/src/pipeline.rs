//! The pipeline controller: a state machine that drives prefetching,
//! composition, audio mixdown, and encoding for one render.
//!
//! Exactly one `RenderSession` exists per invocation; it owns every
//! native resource and releases all of them on every exit path,
//! success, failure, or cancellation alike.

use crate::cancel::CancelHandle;
use crate::compositor::Compositor;
use crate::prefetch::Prefetcher;
use crate::sink::EncoderSink;
use crate::source::{ClipHandle, ClipSource, MediaClipSource};
use reelcut_audio::{mix_background, MixedAudio};
use reelcut_core::{RationalTime, ReelcutError, RenderTarget, Result};
use reelcut_timeline::{Clip, ClipLibrary, Timeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Background audio requested by the caller.
#[derive(Debug, Clone)]
pub struct AudioTrack {
    /// Byte-addressable audio source
    pub source: PathBuf,
}

/// Everything one render consumes from its collaborators.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Playback order and cut durations, fully formed by the planner
    pub timeline: Timeline,
    /// Resolvable clip records
    pub library: ClipLibrary,
    /// Optional background track; its absence means a silent output
    pub audio: Option<AudioTrack>,
    /// Fixed output configuration
    pub target: RenderTarget,
}

/// Progress reported after every composed frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderProgress {
    /// Monotonically non-decreasing fraction in `[0, 1]`; reaches
    /// exactly 1.0 once, at finalization
    pub fraction: f64,
    /// Index of the item currently playing
    pub current_item: usize,
    /// Total number of timeline items
    pub items_total: usize,
    /// Output time rendered so far
    pub rendered: RationalTime,
}

/// Controller states for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Initializing,
    Playing(usize),
    Swapping(usize),
    Finalizing,
    Completed,
    Failed,
}

/// Mutable run state for one render invocation.
struct RenderSession {
    state: PipelineState,
    processed: RationalTime,
    total: RationalTime,
    items_total: usize,
    last_fraction: f64,
}

impl RenderSession {
    fn new(timeline: &Timeline) -> Self {
        Self {
            state: PipelineState::Idle,
            processed: RationalTime::ZERO,
            total: timeline.total_duration(),
            items_total: timeline.len(),
            last_fraction: 0.0,
        }
    }

    fn transition(&mut self, to: PipelineState) {
        debug!(from = ?self.state, to = ?to, "pipeline state");
        self.state = to;
    }

    /// Per-frame progress, capped below 1.0 until finalization and
    /// clamped monotone.
    fn emit_frame_progress(
        &mut self,
        on_progress: &mut dyn FnMut(RenderProgress),
        item: usize,
        elapsed_in_clip: RationalTime,
    ) {
        let rendered = self.processed + elapsed_in_clip;
        let raw = if self.total.is_positive() {
            rendered.to_seconds_f64() / self.total.to_seconds_f64()
        } else {
            0.0
        };
        let fraction = raw.min(0.99).max(self.last_fraction);
        self.last_fraction = fraction;
        on_progress(RenderProgress {
            fraction,
            current_item: item,
            items_total: self.items_total,
            rendered,
        });
    }

    /// The single 1.0 report, after the sink has finalized.
    fn emit_final_progress(&mut self, on_progress: &mut dyn FnMut(RenderProgress)) {
        self.last_fraction = 1.0;
        on_progress(RenderProgress {
            fraction: 1.0,
            current_item: self.items_total.saturating_sub(1),
            items_total: self.items_total,
            rendered: self.total,
        });
    }
}

/// Decode the background track once, up front, and shape it to the
/// output duration. A decode failure aborts the render; the caller
/// asked for audio and never silently loses it.
pub fn prepare_background(
    track: &AudioTrack,
    total: RationalTime,
    target: &RenderTarget,
) -> Result<MixedAudio> {
    let samples = reelcut_media::decode_background_track(&track.source, target.audio_sample_rate)?;
    Ok(mix_background(
        &samples,
        target.audio_sample_rate,
        2,
        total,
    ))
}

/// The render pipeline, generic over how clips are resolved.
pub struct Pipeline<S: ClipSource> {
    source: Arc<S>,
}

impl Pipeline<MediaClipSource> {
    /// Pipeline resolving clips through spawned FFmpeg decoders.
    pub fn with_media_source() -> Self {
        Self::new(Arc::new(MediaClipSource))
    }
}

impl<S: ClipSource> Pipeline<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Run one complete render: decode and mix the background track,
    /// then compose and encode the timeline. Returns the container
    /// bytes, or a typed error with the session fully torn down.
    pub fn render<K: EncoderSink>(
        &self,
        request: &RenderRequest,
        sink: K,
        on_progress: impl FnMut(RenderProgress),
        cancel: &CancelHandle,
    ) -> Result<Vec<u8>> {
        let audio = match &request.audio {
            Some(track) => Some(prepare_background(
                track,
                request.timeline.total_duration(),
                &request.target,
            )?),
            None => None,
        };
        self.render_with_audio(request, audio, sink, on_progress, cancel)
    }

    /// Run a render with the background track already mixed (or absent).
    pub fn render_with_audio<K: EncoderSink>(
        &self,
        request: &RenderRequest,
        audio: Option<MixedAudio>,
        mut sink: K,
        mut on_progress: impl FnMut(RenderProgress),
        cancel: &CancelHandle,
    ) -> Result<Vec<u8>> {
        let mut session = RenderSession::new(&request.timeline);
        let mut emit = move |p: RenderProgress| on_progress(p);

        match self.run(request, audio, &mut sink, &mut session, &mut emit, cancel) {
            Ok(()) => {
                session.transition(PipelineState::Finalizing);
                let bytes = match sink.finish() {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        session.transition(PipelineState::Failed);
                        return Err(err);
                    }
                };
                session.emit_final_progress(&mut emit);
                session.transition(PipelineState::Completed);
                info!(
                    items = request.timeline.len(),
                    duration = %request.timeline.total_duration(),
                    "render completed"
                );
                Ok(bytes)
            }
            Err(err) => {
                session.transition(PipelineState::Failed);
                sink.abort();
                if err.is_cancelled() {
                    info!("render cancelled by caller");
                } else {
                    warn!(error = %err, "render failed");
                }
                Err(err)
            }
        }
    }

    /// The playback loop. Clip handles and the prefetcher live inside
    /// this scope, so they are dropped (and their processes killed) on
    /// every exit path.
    fn run<K: EncoderSink>(
        &self,
        request: &RenderRequest,
        audio: Option<MixedAudio>,
        sink: &mut K,
        session: &mut RenderSession,
        on_progress: &mut dyn FnMut(RenderProgress),
        cancel: &CancelHandle,
    ) -> Result<()> {
        session.transition(PipelineState::Initializing);

        if cancel.is_cancelled() {
            return Err(ReelcutError::Cancelled);
        }

        // Audio timing is fixed here, before the first frame; clip
        // switches can stall video but never reach the track.
        sink.start(audio.as_ref())?;

        let clips = resolve_playback_order(request)?;
        let (mut prefetcher, mut current) =
            Prefetcher::start(Arc::clone(&self.source), clips, request.target)?;

        let rate = request.target.frame_rate;
        let mut compositor = Compositor::new(&request.target);
        let items = request.timeline.items();

        for (index, item) in items.iter().enumerate() {
            session.transition(PipelineState::Playing(index));
            let frames = rate.frames_covering(item.cut_duration);

            for frame_index in 0..frames {
                if cancel.is_cancelled() {
                    return Err(ReelcutError::Cancelled);
                }

                match current.next_frame()? {
                    Some(frame) => {
                        compositor.compose(&frame);
                    }
                    // Content ended inside the cut window: hold the
                    // last composed frame until the cut elapses.
                    None => {}
                }

                sink.write_frame(compositor.canvas())?;
                let elapsed = RationalTime::from_frames(frame_index + 1, rate);
                session.emit_frame_progress(on_progress, index, elapsed);
            }

            session.processed = session.processed + item.cut_duration;

            if index + 1 < items.len() {
                session.transition(PipelineState::Swapping(index));
                current = prefetcher.advance()?.ok_or_else(|| {
                    ReelcutError::ClipLoad("prefetch queue exhausted early".into())
                })?;
            }
        }

        Ok(())
    }
}

/// Resolve every timeline item against the library, in playback order.
fn resolve_playback_order(request: &RenderRequest) -> Result<Vec<Clip>> {
    request
        .timeline
        .items()
        .iter()
        .map(|item| {
            request
                .library
                .get(item.clip_id)
                .cloned()
                .ok_or_else(|| {
                    ReelcutError::Timeline(format!("unresolvable clip {}", item.clip_id))
                })
        })
        .collect()
}
