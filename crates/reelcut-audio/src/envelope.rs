//! Fade-in / hold / fade-out gain envelope.
//!
//! The envelope is a pure function of elapsed output time, so it can be
//! tested without any audio backend and evaluated sample-by-sample
//! during mixdown.

/// Fixed fade length at both ends of the output.
pub const FADE_DURATION_SECS: f64 = 1.5;

/// A linear fade-in / hold / fade-out envelope over one output.
///
/// Gain ramps 0→1 over the first `fade` seconds, holds at 1 until
/// `total - fade`, then ramps 1→0 to the end. The fade is clamped so
/// the two ramps never overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeEnvelope {
    total_secs: f64,
    fade_secs: f64,
}

impl FadeEnvelope {
    /// Build the envelope for an output of the given total duration,
    /// using the fixed fade length clamped to half the total.
    pub fn for_duration(total_secs: f64) -> Self {
        Self::with_fade(total_secs, FADE_DURATION_SECS)
    }

    /// Build an envelope with an explicit fade length (still clamped).
    pub fn with_fade(total_secs: f64, fade_secs: f64) -> Self {
        let total_secs = total_secs.max(0.0);
        let fade_secs = fade_secs.max(0.0).min(total_secs / 2.0);
        Self {
            total_secs,
            fade_secs,
        }
    }

    /// The effective fade length after clamping.
    pub fn fade_secs(&self) -> f64 {
        self.fade_secs
    }

    /// Gain at elapsed output time `t`, in `[0, 1]`.
    ///
    /// Zero outside `[0, total]`.
    pub fn gain(&self, t: f64) -> f64 {
        if t < 0.0 || t > self.total_secs || self.total_secs == 0.0 {
            return 0.0;
        }
        if self.fade_secs == 0.0 {
            return 1.0;
        }
        if t < self.fade_secs {
            t / self.fade_secs
        } else if t > self.total_secs - self.fade_secs {
            (self.total_secs - t) / self.fade_secs
        } else {
            1.0
        }
    }
}
