//! Integration tests for the background-audio mixdown.

use reelcut_audio::{mix_background, FadeEnvelope, FADE_DURATION_SECS};
use reelcut_core::RationalTime;

#[test]
fn envelope_matches_the_required_shape() {
    // 1.5s fades over a 10s output
    let env = FadeEnvelope::for_duration(10.0);
    assert_eq!(env.fade_secs(), FADE_DURATION_SECS);
    assert_eq!(env.gain(0.0), 0.0);
    assert_eq!(env.gain(1.5), 1.0);
    assert_eq!(env.gain(8.5), 1.0);
    assert_eq!(env.gain(10.0), 0.0);
}

#[test]
fn mixed_track_carries_the_envelope_end_to_end() {
    let rate = 8_000u32;
    let total = RationalTime::new(10, 1);
    // Constant full-scale input makes each mixed sample equal the gain
    let track = vec![1.0f32; rate as usize * 10 * 2];

    let mixed = mix_background(&track, rate, 2, total);
    assert!((mixed.duration_secs() - 10.0).abs() < 1e-9);

    let at = |secs: f64| mixed.samples[(secs * rate as f64) as usize * 2];
    assert_eq!(at(0.0), 0.0);
    assert!((at(5.0) - 1.0).abs() < 1e-3);
    // Final sample sits one sample interval before t=10
    let last = mixed.samples[mixed.samples.len() - 2];
    assert!(last < 1e-3);
}

#[test]
fn short_output_clamps_both_fades() {
    let mixed = mix_background(
        &vec![1.0f32; 48_000 * 4],
        48_000,
        2,
        RationalTime::new(2, 1),
    );
    // Fades clamp to 1s each; the midpoint is the only unity-gain instant
    let mid = mixed.samples[48_000 * 2]; // t = 1.0s
    assert!((mid - 1.0).abs() < 1e-3);
    assert!(mixed.samples[48_000 / 2 * 2] < 1.0); // t = 0.25s is mid-ramp
}
