//! Reelcut Timeline - Planner-produced timeline data model
//!
//! The external planning step supplies an ordered list of clip
//! references with per-clip trimmed durations. This crate ingests that
//! plan, clamps each cut into the valid range, and exposes an immutable
//! `Timeline` to the render pipeline:
//! - `Clip` / `ClipLibrary`: the resolvable clip records
//! - `RenderPlan`: the serde-facing plan format
//! - `Timeline` / `TimelineItem`: the validated playback order

pub mod clip;
pub mod plan;
pub mod timeline;

pub use clip::{Clip, ClipLibrary};
pub use plan::{PlanItem, RenderPlan};
pub use timeline::{Timeline, TimelineItem};
