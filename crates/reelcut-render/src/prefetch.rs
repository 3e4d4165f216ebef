//! Double-buffered clip prefetching.
//!
//! Two slots: "current" is owned by the draw loop, "standby" is a
//! pending load filled by a background thread. Slot contents are moved,
//! never aliased, so the swap needs no locking: the receiver hand-off
//! is the entire critical section.

use crate::source::ClipSource;
use crossbeam_channel::{bounded, Receiver};
use reelcut_core::{ReelcutError, RenderTarget, Result};
use reelcut_timeline::Clip;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

struct PendingLoad<H> {
    index: usize,
    rx: Receiver<Result<H>>,
}

/// Keeps the next clip loading while the current one plays.
///
/// By the time clip *i* finishes, clip *i+1* is ready unless its load
/// took longer than clip *i*'s playback; in that case `advance` blocks
/// for exactly the remaining load time. A failed load aborts the render
/// with `ClipLoad`.
pub struct Prefetcher<S: ClipSource> {
    source: Arc<S>,
    queue: Vec<Clip>,
    target: RenderTarget,
    next_load: usize,
    standby: Option<PendingLoad<S::Handle>>,
    last_swap_wait: Duration,
}

impl<S: ClipSource> Prefetcher<S> {
    /// Load the first clip synchronously and kick off the second load
    /// in the background. Returns the prefetcher and the first handle.
    ///
    /// A single-clip queue never spawns a loader thread.
    pub fn start(
        source: Arc<S>,
        queue: Vec<Clip>,
        target: RenderTarget,
    ) -> Result<(Self, S::Handle)> {
        if queue.is_empty() {
            return Err(ReelcutError::InvalidParameter(
                "prefetcher needs at least one clip".into(),
            ));
        }

        let current = source.load(&queue[0], &target)?;
        info!(clip = %queue[0].name, "first clip loaded");

        let mut prefetcher = Self {
            source,
            queue,
            target,
            next_load: 1,
            standby: None,
            last_swap_wait: Duration::ZERO,
        };
        prefetcher.kick_standby()?;
        Ok((prefetcher, current))
    }

    /// After the current clip's stop condition fires: take the standby
    /// handle (blocking only if its load is still in flight), then start
    /// loading the clip after it. `None` when the queue is exhausted.
    pub fn advance(&mut self) -> Result<Option<S::Handle>> {
        let Some(pending) = self.standby.take() else {
            return Ok(None);
        };

        let waited_from = Instant::now();
        let handle = pending
            .rx
            .recv()
            .map_err(|_| ReelcutError::ClipLoad("clip loader thread terminated".into()))??;
        self.last_swap_wait = waited_from.elapsed();

        debug!(
            item = pending.index,
            wait_us = self.last_swap_wait.as_micros() as u64,
            "swapped to prefetched clip"
        );

        self.kick_standby()?;
        Ok(Some(handle))
    }

    /// How long the most recent `advance` blocked on the in-flight load.
    pub fn last_swap_wait(&self) -> Duration {
        self.last_swap_wait
    }

    fn kick_standby(&mut self) -> Result<()> {
        if self.next_load >= self.queue.len() {
            return Ok(());
        }
        let index = self.next_load;
        self.next_load += 1;

        let (tx, rx) = bounded(1);
        let source = Arc::clone(&self.source);
        let clip = self.queue[index].clone();
        let target = self.target;

        std::thread::Builder::new()
            .name(format!("reelcut-load-{index}"))
            .spawn(move || {
                // If the render tore down first the send just fails and
                // the loaded handle is dropped here.
                let _ = tx.send(source.load(&clip, &target));
            })
            .map_err(|e| ReelcutError::ClipLoad(format!("failed to spawn loader: {e}")))?;

        self.standby = Some(PendingLoad { index, rx });
        Ok(())
    }
}
