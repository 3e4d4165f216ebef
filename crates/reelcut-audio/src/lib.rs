//! Reelcut Audio - Background-track mixdown
//!
//! The background track is decoded once, up front, and shaped into a
//! single buffer spanning the whole output duration before any video
//! frame is drawn. Clip switches can stall the video side; they can
//! never touch the audio, because by the time the first frame renders
//! the audio is already fully mixed.
//!
//! - `FadeEnvelope`: pure time-to-gain function (fade-in / hold / fade-out)
//! - `MixedAudio` / `mix_background`: envelope applied over the full
//!   output duration, padded or truncated to exact length

pub mod envelope;
pub mod mix;

pub use envelope::{FadeEnvelope, FADE_DURATION_SECS};
pub use mix::{mix_background, MixedAudio};
