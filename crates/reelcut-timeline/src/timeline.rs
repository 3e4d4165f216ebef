//! The validated, immutable timeline a render runs against.

use crate::clip::ClipLibrary;
use crate::plan::RenderPlan;
use reelcut_core::{RationalTime, ReelcutError, Result, TimeRange};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One validated timeline entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineItem {
    /// Which clip to show
    pub clip_id: Uuid,
    /// Trimmed duration, clamped into `(0, clip.duration]` at ingestion
    pub cut_duration: RationalTime,
    /// Planner rationale; carried for display, never read by the pipeline
    pub reasoning: Option<String>,
}

/// Ordered sequence of cuts. Immutable for the lifetime of one render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    items: Vec<TimelineItem>,
}

impl Timeline {
    /// Ingest a planner-produced plan against a clip library.
    ///
    /// Cuts longer than the clip's natural duration are clamped down to
    /// it. Non-positive cuts and unresolvable clip ids reject the whole
    /// plan, as does an empty plan.
    pub fn from_plan(plan: &RenderPlan, library: &ClipLibrary) -> Result<Self> {
        if plan.items.is_empty() {
            return Err(ReelcutError::Timeline("plan contains no items".into()));
        }

        let mut items = Vec::with_capacity(plan.items.len());
        for (index, planned) in plan.items.iter().enumerate() {
            let clip = library.get(planned.clip_id).ok_or_else(|| {
                ReelcutError::Timeline(format!(
                    "item {index} references unknown clip {}",
                    planned.clip_id
                ))
            })?;

            let requested = RationalTime::from_seconds_f64(planned.cut_duration_secs);
            if !requested.is_positive() {
                return Err(ReelcutError::Timeline(format!(
                    "item {index} ('{}') has non-positive cut duration",
                    clip.name
                )));
            }

            items.push(TimelineItem {
                clip_id: planned.clip_id,
                cut_duration: requested.min(clip.duration),
                reasoning: planned.reasoning.clone(),
            });
        }

        Ok(Self { items })
    }

    /// Build a timeline directly from validated items (tests, tooling).
    pub fn from_items(items: Vec<TimelineItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(ReelcutError::Timeline("timeline has no items".into()));
        }
        Ok(Self { items })
    }

    /// The items in playback order.
    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the timeline has no items. Ingestion rejects empty
    /// plans, but deserialized timelines skip that validation.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total target duration: the progress denominator.
    pub fn total_duration(&self) -> RationalTime {
        self.items.iter().map(|item| item.cut_duration).sum()
    }

    /// The window an item occupies on the output timeline.
    pub fn item_window(&self, index: usize) -> Option<TimeRange> {
        if index >= self.items.len() {
            return None;
        }
        let start: RationalTime = self.items[..index]
            .iter()
            .map(|item| item.cut_duration)
            .sum();
        Some(TimeRange::new(start, self.items[index].cut_duration))
    }
}
