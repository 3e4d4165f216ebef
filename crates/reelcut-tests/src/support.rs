//! Synthetic clip sources and scenario builders shared by the
//! integration tests. No ffmpeg involved: loads sleep, frames are
//! solid colors, and every live handle is counted so teardown can be
//! asserted.

use reelcut_core::{FrameBuffer, RationalTime, ReelcutError, RenderTarget, Result};
use reelcut_render::{ClipHandle, ClipSource, RenderRequest};
use reelcut_timeline::{Clip, ClipLibrary, Timeline, TimelineItem};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Behavior of one synthetic clip.
#[derive(Debug, Clone)]
pub struct ClipSpec {
    pub color: [u8; 4],
    pub width: u32,
    pub height: u32,
    /// Frames the clip can deliver before its content ends
    pub frames: i64,
    /// Simulated load I/O latency
    pub load_delay: Duration,
    /// Whether opening the byte source fails
    pub fail_load: bool,
}

impl ClipSpec {
    /// A 90x160 portrait clip with plenty of content for `cut_secs`.
    pub fn portrait(color: [u8; 4], cut_secs: f64) -> Self {
        Self {
            color,
            width: 90,
            height: 160,
            frames: (cut_secs * 60.0).ceil() as i64 + 60,
            load_delay: Duration::ZERO,
            fail_load: false,
        }
    }

    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_load = true;
        self
    }
}

/// Clip source resolving against in-memory specs.
pub struct SyntheticSource {
    specs: HashMap<Uuid, ClipSpec>,
    live_handles: Arc<AtomicUsize>,
}

impl SyntheticSource {
    pub fn new(specs: HashMap<Uuid, ClipSpec>) -> Self {
        Self {
            specs,
            live_handles: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of handles loaded and not yet dropped.
    pub fn live_handles(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live_handles)
    }
}

impl ClipSource for SyntheticSource {
    type Handle = SyntheticHandle;

    fn load(&self, clip: &Clip, _target: &RenderTarget) -> Result<Self::Handle> {
        let spec = self
            .specs
            .get(&clip.id)
            .ok_or_else(|| ReelcutError::ClipLoad(format!("unknown synthetic clip {}", clip.id)))?
            .clone();

        if !spec.load_delay.is_zero() {
            std::thread::sleep(spec.load_delay);
        }
        if spec.fail_load {
            return Err(ReelcutError::ClipLoad(format!(
                "source for '{}' is unreadable",
                clip.name
            )));
        }

        self.live_handles.fetch_add(1, Ordering::SeqCst);
        Ok(SyntheticHandle {
            frame: FrameBuffer::solid(spec.width, spec.height, spec.color),
            remaining: spec.frames,
            live_handles: Arc::clone(&self.live_handles),
        })
    }
}

pub struct SyntheticHandle {
    frame: FrameBuffer,
    remaining: i64,
    live_handles: Arc<AtomicUsize>,
}

impl ClipHandle for SyntheticHandle {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>> {
        if self.remaining <= 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(self.frame.clone()))
    }
}

impl Drop for SyntheticHandle {
    fn drop(&mut self) {
        self.live_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A ready-to-render scenario plus the hooks tests assert against.
pub struct Scenario {
    pub request: RenderRequest,
    pub source: Arc<SyntheticSource>,
    pub live_handles: Arc<AtomicUsize>,
    pub clip_ids: Vec<Uuid>,
}

/// A 90x160 render target so composed frames stay small.
pub fn small_target() -> RenderTarget {
    RenderTarget {
        width: 90,
        height: 160,
        ..RenderTarget::vertical_1080p60()
    }
}

/// Build a scenario from `(cut_secs, spec)` pairs.
pub fn build_scenario(cuts: &[(f64, ClipSpec)]) -> Scenario {
    let mut library = ClipLibrary::new();
    let mut specs = HashMap::new();
    let mut items = Vec::new();
    let mut clip_ids = Vec::new();

    for (index, (cut_secs, spec)) in cuts.iter().enumerate() {
        let clip = Clip::new(
            format!("clip-{index}"),
            RationalTime::from_seconds_f64(cut_secs * 2.0),
            format!("synthetic://clip-{index}"),
        );
        let id = clip.id;
        specs.insert(id, spec.clone());
        library.insert(clip);
        items.push(TimelineItem {
            clip_id: id,
            cut_duration: RationalTime::from_seconds_f64(*cut_secs),
            reasoning: None,
        });
        clip_ids.push(id);
    }

    let source = Arc::new(SyntheticSource::new(specs));
    let live_handles = source.live_handles();

    Scenario {
        request: RenderRequest {
            timeline: Timeline::from_items(items).unwrap(),
            library,
            audio: None,
            target: small_target(),
        },
        source,
        live_handles,
        clip_ids,
    }
}

/// Install a noisy-test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}
