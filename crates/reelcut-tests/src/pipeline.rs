//! End-to-end pipeline scenarios over synthetic clip sources: frame
//! accuracy, progress, double-buffer behavior, failure, cancellation,
//! and teardown.

use crate::support::{build_scenario, init_tracing, small_target, ClipSpec};
use reelcut_audio::mix_background;
use reelcut_core::{RationalTime, ReelcutError};
use reelcut_render::{
    AudioTrack, CancelHandle, CollectingSink, Pipeline, Prefetcher, RenderProgress,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

#[test]
fn end_to_end_without_audio() {
    init_tracing();
    let scenario = build_scenario(&[
        (5.0, ClipSpec::portrait(RED, 5.0)),
        (3.0, ClipSpec::portrait(GREEN, 3.0)),
        (2.0, ClipSpec::portrait(BLUE, 2.0)),
    ]);

    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let sink = CollectingSink::new();
    let stats = sink.stats();

    let bytes = pipeline
        .render(&scenario.request, sink, |_| {}, &CancelHandle::new())
        .unwrap();

    // 10 seconds at 60 fps
    assert_eq!(bytes, b"frames:600");
    let stats = stats.lock().unwrap();
    assert!(stats.finished);
    assert!(!stats.aborted);
    assert_eq!(stats.frames_written, 600);
    assert!(stats.audio.is_none());

    assert_eq!(scenario.live_handles.load(Ordering::SeqCst), 0);
}

#[test]
fn end_to_end_with_background_audio() {
    let scenario = build_scenario(&[
        (5.0, ClipSpec::portrait(RED, 5.0)),
        (3.0, ClipSpec::portrait(GREEN, 3.0)),
        (2.0, ClipSpec::portrait(BLUE, 2.0)),
    ]);
    let total = scenario.request.timeline.total_duration();
    assert_eq!(total, RationalTime::new(10, 1));

    let rate = scenario.request.target.audio_sample_rate;
    // Full-scale constant track: each mixed sample equals the gain
    let track = vec![1.0f32; rate as usize * 10 * 2];
    let mixed = mix_background(&track, rate, 2, total);

    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let sink = CollectingSink::new();
    let stats = sink.stats();

    pipeline
        .render_with_audio(
            &scenario.request,
            Some(mixed),
            sink,
            |_| {},
            &CancelHandle::new(),
        )
        .unwrap();

    let stats = stats.lock().unwrap();
    let audio = stats.audio.as_ref().expect("sink received mixed audio");
    let at = |secs: f64| audio.samples[(secs * rate as f64) as usize * 2];
    assert_eq!(at(0.0), 0.0);
    assert!((at(5.0) - 1.0).abs() < 1e-3);
    assert!(audio.samples[audio.samples.len() - 2] < 1e-3);
    assert!((audio.duration_secs() - 10.0).abs() < 1e-9);
}

#[test]
fn unreadable_background_track_aborts_instead_of_rendering_silent() {
    let mut scenario = build_scenario(&[(1.0, ClipSpec::portrait(RED, 1.0))]);
    scenario.request.audio = Some(AudioTrack {
        source: "/nonexistent/bgm.mp3".into(),
    });

    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let sink = CollectingSink::new();
    let stats = sink.stats();

    let err = pipeline
        .render(&scenario.request, sink, |_| {}, &CancelHandle::new())
        .unwrap_err();

    // The caller asked for audio; a track-less output is never substituted
    assert!(matches!(err, ReelcutError::AudioDecode(_)));
    let stats = stats.lock().unwrap();
    assert!(!stats.started);
    assert_eq!(stats.frames_written, 0);
}

#[test]
fn per_item_elapsed_time_stays_within_one_frame_of_the_cut() {
    let cuts = [1.505f64, 0.51, 2.0];
    let scenario = build_scenario(&[
        (cuts[0], ClipSpec::portrait(RED, cuts[0])),
        (cuts[1], ClipSpec::portrait(GREEN, cuts[1])),
        (cuts[2], ClipSpec::portrait(BLUE, cuts[2])),
    ]);

    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let sink = CollectingSink::new();
    let mut reports: Vec<RenderProgress> = Vec::new();
    pipeline
        .render(
            &scenario.request,
            sink,
            |p| reports.push(p),
            &CancelHandle::new(),
        )
        .unwrap();

    let frame_interval = 1.0 / 60.0;
    for (index, cut) in cuts.iter().enumerate() {
        let window = scenario.request.timeline.item_window(index).unwrap();
        let rendered_in_item = reports
            .iter()
            .filter(|p| p.current_item == index && p.fraction < 1.0)
            .map(|p| (p.rendered - window.start).to_seconds_f64())
            .fold(0.0f64, f64::max);
        // Never more than the cut, at most one frame interval less
        assert!(rendered_in_item <= *cut + 1e-9, "item {index} overshot");
        assert!(
            cut - rendered_in_item < frame_interval,
            "item {index} undershot by more than one frame"
        );
    }
}

#[test]
fn progress_is_monotone_and_reaches_one_exactly_once() {
    let scenario = build_scenario(&[
        (1.0, ClipSpec::portrait(RED, 1.0)),
        (1.0, ClipSpec::portrait(GREEN, 1.0)),
    ]);

    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let mut fractions: Vec<f64> = Vec::new();
    pipeline
        .render(
            &scenario.request,
            CollectingSink::new(),
            |p| fractions.push(p.fraction),
            &CancelHandle::new(),
        )
        .unwrap();

    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(fractions.iter().filter(|f| **f >= 1.0).count(), 1);
    assert_eq!(*fractions.last().unwrap(), 1.0);
    // Everything before finalization is capped below 1.0
    assert!(fractions[..fractions.len() - 1].iter().all(|f| *f <= 0.99));
}

#[test]
fn composed_frames_are_letterboxed_and_centered() {
    let mut landscape = ClipSpec::portrait(RED, 0.5);
    landscape.width = 200;
    landscape.height = 100;
    let scenario = build_scenario(&[(0.5, landscape)]);

    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let sink = CollectingSink::new();
    let stats = sink.stats();
    pipeline
        .render(&scenario.request, sink, |_| {}, &CancelHandle::new())
        .unwrap();

    let stats = stats.lock().unwrap();
    let frame = stats.first_frame.as_ref().unwrap();
    assert_eq!(frame.width, small_target().width);
    // 200x100 on 90x160 draws 90x45 centered: black above, red inside
    assert_eq!(frame.pixel(45, 5), [0, 0, 0, 255]);
    assert_eq!(frame.pixel(45, 80), RED);
    assert_eq!(frame.pixel(45, 155), [0, 0, 0, 255]);
}

#[test]
fn single_item_timeline_renders_without_prefetch() {
    let scenario = build_scenario(&[(0.5, ClipSpec::portrait(RED, 0.5))]);
    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let sink = CollectingSink::new();
    let stats = sink.stats();

    pipeline
        .render(&scenario.request, sink, |_| {}, &CancelHandle::new())
        .unwrap();

    assert_eq!(stats.lock().unwrap().frames_written, 30);
    assert_eq!(scenario.live_handles.load(Ordering::SeqCst), 0);
}

#[test]
fn fast_loads_make_swaps_waitless() {
    let scenario = build_scenario(&[
        (0.5, ClipSpec::portrait(RED, 0.5)),
        (0.5, ClipSpec::portrait(GREEN, 0.5)),
        (0.5, ClipSpec::portrait(BLUE, 0.5)),
    ]);
    let clips: Vec<_> = scenario
        .clip_ids
        .iter()
        .map(|id| scenario.request.library.get(*id).unwrap().clone())
        .collect();

    let (mut prefetcher, _current) =
        Prefetcher::start(Arc::clone(&scenario.source), clips, small_target()).unwrap();

    for _ in 0..2 {
        // Simulated playback of the previous item
        std::thread::sleep(Duration::from_millis(50));
        assert!(prefetcher.advance().unwrap().is_some());
        assert!(
            prefetcher.last_swap_wait() < Duration::from_millis(50),
            "swap should not wait when the load finished during playback"
        );
    }
    assert!(prefetcher.advance().unwrap().is_none());
}

#[test]
fn slow_load_makes_the_swap_wait_only_the_remainder() {
    let scenario = build_scenario(&[
        (0.5, ClipSpec::portrait(RED, 0.5)),
        (
            0.5,
            ClipSpec::portrait(GREEN, 0.5).with_load_delay(Duration::from_millis(300)),
        ),
    ]);
    let clips: Vec<_> = scenario
        .clip_ids
        .iter()
        .map(|id| scenario.request.library.get(*id).unwrap().clone())
        .collect();

    let (mut prefetcher, _current) =
        Prefetcher::start(Arc::clone(&scenario.source), clips, small_target()).unwrap();

    // 50ms of playback against a 300ms load: roughly 250ms remain
    std::thread::sleep(Duration::from_millis(50));
    assert!(prefetcher.advance().unwrap().is_some());
    let wait = prefetcher.last_swap_wait();
    assert!(wait >= Duration::from_millis(100), "wait was {wait:?}");
    assert!(wait < Duration::from_millis(450), "wait was {wait:?}");
}

#[test]
fn unreadable_clip_fails_the_render_and_releases_everything() {
    let scenario = build_scenario(&[
        (0.5, ClipSpec::portrait(RED, 0.5)),
        (0.5, ClipSpec::portrait(GREEN, 0.5).failing()),
        (0.5, ClipSpec::portrait(BLUE, 0.5)),
    ]);

    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let sink = CollectingSink::new();
    let stats = sink.stats();

    let err = pipeline
        .render(&scenario.request, sink, |_| {}, &CancelHandle::new())
        .unwrap_err();

    assert!(matches!(err, ReelcutError::ClipLoad(_)));
    let stats = stats.lock().unwrap();
    assert!(stats.aborted);
    assert!(!stats.finished);
    // Item A was drawn before the swap discovered the bad load
    assert_eq!(stats.frames_written, 30);
    assert_eq!(scenario.live_handles.load(Ordering::SeqCst), 0);
}

#[test]
fn cancellation_stops_drawing_and_produces_no_output() {
    let scenario = build_scenario(&[
        (2.0, ClipSpec::portrait(RED, 2.0)),
        (2.0, ClipSpec::portrait(GREEN, 2.0)),
    ]);

    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let sink = CollectingSink::new();
    let stats = sink.stats();
    let cancel = CancelHandle::new();
    let cancel_from_callback = cancel.clone();

    let mut reports = 0u32;
    let err = pipeline
        .render(
            &scenario.request,
            sink,
            |_| {
                reports += 1;
                if reports == 30 {
                    cancel_from_callback.cancel();
                }
            },
            &cancel,
        )
        .unwrap_err();

    assert!(err.is_cancelled());
    let stats = stats.lock().unwrap();
    assert!(stats.aborted);
    assert!(!stats.finished);
    assert!(stats.frames_written < 240);
    assert_eq!(scenario.live_handles.load(Ordering::SeqCst), 0);
}

#[test]
fn cancellation_before_start_draws_nothing() {
    let scenario = build_scenario(&[(1.0, ClipSpec::portrait(RED, 1.0))]);
    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let sink = CollectingSink::new();
    let stats = sink.stats();

    let cancel = CancelHandle::new();
    cancel.cancel();

    let err = pipeline
        .render(&scenario.request, sink, |_| {}, &cancel)
        .unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(stats.lock().unwrap().frames_written, 0);
}

#[test]
fn short_clip_holds_its_last_frame_for_the_rest_of_the_cut() {
    // Clip content ends after 10 frames but the cut wants 30
    let mut short = ClipSpec::portrait(RED, 0.5);
    short.frames = 10;
    let scenario = build_scenario(&[(0.5, short)]);

    let pipeline = Pipeline::new(Arc::clone(&scenario.source));
    let sink = CollectingSink::new();
    let stats = sink.stats();
    pipeline
        .render(&scenario.request, sink, |_| {}, &CancelHandle::new())
        .unwrap();

    let stats = stats.lock().unwrap();
    assert_eq!(stats.frames_written, 30);
    // The held frame is still the clip's image, not black
    assert_eq!(stats.last_frame.as_ref().unwrap().pixel(45, 80), RED);
}
