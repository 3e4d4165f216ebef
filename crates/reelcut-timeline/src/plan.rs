//! The serde-facing plan format produced by the external planner.
//!
//! The planner decides which clips appear and for how long; this module
//! only parses its output. Durations arrive as float seconds and are
//! converted to rational time at ingestion.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One planned cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    /// Which clip to show
    pub clip_id: Uuid,
    /// How long to show it, in seconds
    pub cut_duration_secs: f64,
    /// Free-text rationale from the planner; display-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// A complete plan: the playback order of cuts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPlan {
    pub items: Vec<PlanItem>,
}

impl RenderPlan {
    /// Parse a plan from the planner's JSON output.
    pub fn from_json(json: &str) -> reelcut_core::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| reelcut_core::ReelcutError::Timeline(format!("invalid plan JSON: {e}")))
    }
}
