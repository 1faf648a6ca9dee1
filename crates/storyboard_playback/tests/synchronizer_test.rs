// State machine behavior of the playback synchronizer on a manual clock.

use storyboard_core::{AudioAsset, ImageData, PlaybackConfig};
use storyboard_error::PlaybackErrorKind;
use storyboard_playback::{
    LoadTicket, PlaybackEffect, PlaybackEvent, PlaybackSegment, PlaybackState,
    PlaybackSynchronizer,
};

fn images(count: u8) -> Vec<ImageData> {
    (0..count).map(|i| ImageData::png(vec![i])).collect()
}

fn narrated(id: &str, image_count: u8, seconds: f64) -> PlaybackSegment {
    PlaybackSegment::new(
        id,
        20,
        images(image_count),
        Some(AudioAsset::new(vec![0u8; 44], seconds)),
    )
}

fn silent(id: &str, text_len: usize) -> PlaybackSegment {
    PlaybackSegment::new(id, text_len, images(1), None)
}

fn session(segments: Vec<PlaybackSegment>) -> PlaybackSynchronizer {
    PlaybackSynchronizer::new(segments, PlaybackConfig::default()).unwrap()
}

fn load_ticket(effects: &[PlaybackEffect]) -> LoadTicket {
    effects
        .iter()
        .find_map(|e| match e {
            PlaybackEffect::LoadAudio { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("no audio load requested")
}

fn image_advances(effects: &[PlaybackEffect], segment: usize) -> Vec<usize> {
    effects
        .iter()
        .filter_map(|e| match e {
            PlaybackEffect::ShowImage { segment: s, image } if *s == segment => Some(*image),
            _ => None,
        })
        .collect()
}

/// Start playback and acknowledge the first segment's audio at t=0.
fn start_with_audio(sync: &mut PlaybackSynchronizer) -> LoadTicket {
    let effects = sync.handle(PlaybackEvent::Start, 0);
    let ticket = load_ticket(&effects);
    let duration = sync.segments()[0]
        .audio()
        .as_ref()
        .map(AudioAsset::duration_seconds);
    sync.handle(
        PlaybackEvent::AudioReady {
            ticket,
            duration_seconds: duration,
        },
        0,
    );
    ticket
}

#[test]
fn test_empty_session_is_rejected() {
    let err = PlaybackSynchronizer::new(Vec::new(), PlaybackConfig::default()).unwrap_err();
    assert_eq!(err.kind, PlaybackErrorKind::EmptySession);
}

#[test]
fn test_images_cycle_over_audio_duration() {
    let mut sync = session(vec![narrated("a", 3, 9.0), silent("b", 10)]);

    let effects = sync.handle(PlaybackEvent::Start, 0);
    assert_eq!(sync.state(), PlaybackState::LoadingAudio);
    let ticket = load_ticket(&effects);

    let effects = sync.handle(
        PlaybackEvent::AudioReady {
            ticket,
            duration_seconds: Some(9.0),
        },
        0,
    );
    assert!(effects.contains(&PlaybackEffect::PlayAudio { ticket }));
    assert_eq!(sync.state(), PlaybackState::PlayingWithAudio);
    assert_eq!(sync.cycle_interval_ms(), Some(3_000));

    let effects = sync.advance_to(9_000);
    assert_eq!(image_advances(&effects, 0), vec![1, 2, 0]);
    assert_eq!(sync.segment_index(), 0);

    let effects = sync.handle(PlaybackEvent::AudioEnded { ticket }, 9_000);
    assert!(effects.contains(&PlaybackEffect::SegmentChanged { index: 1 }));
    assert!(effects.contains(&PlaybackEffect::StopAudio));
    assert_eq!(sync.state(), PlaybackState::PlayingTimerFallback);
}

#[test]
fn test_unknown_duration_cycles_over_default() {
    let mut sync = session(vec![narrated("a", 4, 0.0)]);
    let effects = sync.handle(PlaybackEvent::Start, 0);
    let ticket = load_ticket(&effects);
    sync.handle(
        PlaybackEvent::AudioReady {
            ticket,
            duration_seconds: Some(f64::INFINITY),
        },
        0,
    );
    assert_eq!(sync.cycle_interval_ms(), Some(2_500));
}

#[test]
fn test_single_image_does_not_cycle() {
    let mut sync = session(vec![narrated("a", 1, 9.0)]);
    start_with_audio(&mut sync);
    assert_eq!(sync.cycle_interval_ms(), None);
    assert!(image_advances(&sync.advance_to(9_000), 0).is_empty());
}

#[test]
fn test_fallback_timer_uses_reading_time() {
    let mut sync = session(vec![silent("a", 50), silent("b", 200)]);
    sync.handle(PlaybackEvent::Start, 0);
    assert_eq!(sync.state(), PlaybackState::PlayingTimerFallback);

    let effects = sync.advance_to(4_999);
    assert!(!effects.contains(&PlaybackEffect::SegmentChanged { index: 1 }));

    let effects = sync.advance_to(5_000);
    assert!(effects.contains(&PlaybackEffect::SegmentChanged { index: 1 }));

    // 200 chars at 60 ms each
    assert!(sync.advance_to(16_999).is_empty());
    let effects = sync.advance_to(17_000);
    assert!(effects.contains(&PlaybackEffect::StateChanged(PlaybackState::Finished)));
}

#[test]
fn test_blocked_autoplay_waits_for_gesture() {
    let mut sync = session(vec![narrated("a", 2, 9.0)]);
    let ticket = start_with_audio(&mut sync);

    let effects = sync.handle(PlaybackEvent::AudioPlayRejected { ticket }, 100);
    assert!(effects.contains(&PlaybackEffect::StateChanged(PlaybackState::Blocked)));
    assert!(!sync.is_playing());
    assert!(sync.controls_visible());

    // Nothing progresses while blocked
    sync.advance_to(60_000);
    assert_eq!(sync.state(), PlaybackState::Blocked);
    assert_eq!(sync.image_position(), 0);

    let effects = sync.handle(PlaybackEvent::TogglePlay, 60_000);
    assert!(effects.contains(&PlaybackEffect::PlayAudio { ticket }));
    assert_eq!(sync.state(), PlaybackState::PlayingWithAudio);
}

#[test]
fn test_audio_error_falls_back_to_timer() {
    let config = PlaybackConfig::default();
    let mut sync = session(vec![narrated("a", 1, 9.0), silent("b", 10)]);
    let ticket = start_with_audio(&mut sync);

    let effects = sync.handle(
        PlaybackEvent::AudioError {
            ticket,
            message: "decode failed".into(),
        },
        1_000,
    );
    assert!(effects.contains(&PlaybackEffect::ShowMediaError(true)));
    assert!(effects.contains(&PlaybackEffect::StopAudio));
    assert_eq!(sync.state(), PlaybackState::PlayingTimerFallback);
    assert_eq!(sync.segment_index(), 0);

    let effects = sync.advance_to(1_000 + config.media_error_indicator_ms);
    assert!(effects.contains(&PlaybackEffect::ShowMediaError(false)));
    assert!(!sync.media_error_visible());

    // 20 chars is under the minimum
    let effects = sync.advance_to(1_000 + config.fallback_min_ms);
    assert!(effects.contains(&PlaybackEffect::SegmentChanged { index: 1 }));
}

#[test]
fn test_stale_audio_notifications_are_ignored() {
    let mut sync = session(vec![narrated("a", 1, 9.0), narrated("b", 1, 4.0)]);
    let first = load_ticket(&sync.handle(PlaybackEvent::Start, 0));

    let effects = sync.handle(PlaybackEvent::Next, 10);
    let second = load_ticket(&effects);
    assert_ne!(first, second);

    assert!(
        sync.handle(
            PlaybackEvent::AudioReady {
                ticket: first,
                duration_seconds: Some(9.0)
            },
            20
        )
        .is_empty()
    );
    assert!(sync.handle(PlaybackEvent::AudioEnded { ticket: first }, 30).is_empty());
    assert_eq!(sync.segment_index(), 1);
    assert_eq!(sync.state(), PlaybackState::LoadingAudio);
}

#[test]
fn test_finish_reveals_controls_and_replays() {
    let mut sync = session(vec![silent("a", 0)]);
    sync.handle(PlaybackEvent::Start, 0);

    let effects = sync.advance_to(5_000);
    assert!(effects.contains(&PlaybackEffect::SetControlsVisible(false)));
    assert!(effects.contains(&PlaybackEffect::SetControlsVisible(true)));
    assert_eq!(sync.state(), PlaybackState::Finished);
    assert!(!sync.is_playing());
    assert_eq!(sync.next_deadline(), None);

    let effects = sync.handle(PlaybackEvent::TogglePlay, 6_000);
    assert!(effects.contains(&PlaybackEffect::SegmentChanged { index: 0 }));
    assert_eq!(sync.state(), PlaybackState::PlayingTimerFallback);
}

#[test]
fn test_pause_preserves_remaining_time() {
    let mut sync = session(vec![silent("a", 0), silent("b", 0)]);
    sync.handle(PlaybackEvent::Start, 0);

    sync.handle(PlaybackEvent::TogglePlay, 2_000);
    assert_eq!(sync.state(), PlaybackState::Paused);
    sync.advance_to(100_000);
    assert_eq!(sync.segment_index(), 0);

    sync.handle(PlaybackEvent::TogglePlay, 100_000);
    assert!(sync.advance_to(102_999).iter().all(|e| !matches!(
        e,
        PlaybackEffect::SegmentChanged { .. }
    )));
    let effects = sync.advance_to(103_000);
    assert!(effects.contains(&PlaybackEffect::SegmentChanged { index: 1 }));
}

#[test]
fn test_pausing_audio_pauses_the_host() {
    let mut sync = session(vec![narrated("a", 1, 9.0)]);
    let ticket = start_with_audio(&mut sync);

    let effects = sync.handle(PlaybackEvent::TogglePlay, 1_000);
    assert!(effects.contains(&PlaybackEffect::PauseAudio));
    let effects = sync.handle(PlaybackEvent::TogglePlay, 2_000);
    assert!(effects.contains(&PlaybackEffect::PlayAudio { ticket }));
}

#[test]
fn test_navigation_stops_at_ends() {
    let mut sync = session(vec![silent("a", 0), silent("b", 0)]);
    sync.handle(PlaybackEvent::Start, 0);

    assert!(sync.handle(PlaybackEvent::Previous, 10).is_empty());
    sync.handle(PlaybackEvent::Next, 20);
    assert_eq!(sync.segment_index(), 1);
    assert!(sync.handle(PlaybackEvent::Next, 30).is_empty());
    sync.handle(PlaybackEvent::Previous, 40);
    assert_eq!(sync.segment_index(), 0);
}

#[test]
fn test_jump_to_validates_index() {
    let mut sync = session(vec![silent("a", 0), silent("b", 0)]);
    let err = sync.jump_to(2, 0).unwrap_err();
    assert_eq!(err.kind, PlaybackErrorKind::SegmentOutOfRange(2));

    let effects = sync.jump_to(1, 0).unwrap();
    assert!(effects.contains(&PlaybackEffect::SegmentChanged { index: 1 }));
    assert!(sync.is_playing());
}

#[test]
fn test_controls_hide_while_playing() {
    let config = PlaybackConfig::default();
    let mut sync = session(vec![silent("a", 1_000)]);
    sync.handle(PlaybackEvent::Start, 0);
    assert!(sync.controls_visible());

    sync.advance_to(config.controls_hide_delay_ms);
    assert!(!sync.controls_visible());

    let effects = sync.handle(PlaybackEvent::UserActivity, 10_000);
    assert_eq!(effects, vec![PlaybackEffect::SetControlsVisible(true)]);
    sync.advance_to(10_000 + config.controls_hide_delay_ms);
    assert!(!sync.controls_visible());

    // Paused sessions keep controls up
    sync.handle(PlaybackEvent::TogglePlay, 20_000);
    sync.advance_to(30_000);
    assert!(sync.controls_visible());
}

#[test]
fn test_fullscreen_is_orthogonal() {
    let mut sync = session(vec![narrated("a", 2, 9.0)]);
    start_with_audio(&mut sync);
    let state = sync.state();

    assert_eq!(
        sync.handle(PlaybackEvent::ToggleFullscreen, 10),
        vec![PlaybackEffect::RequestFullscreen(true)]
    );
    assert!(sync.handle(PlaybackEvent::FullscreenChanged(true), 20).is_empty());
    assert!(sync.is_fullscreen());
    assert_eq!(sync.state(), state);
    assert_eq!(
        sync.handle(PlaybackEvent::ToggleFullscreen, 30),
        vec![PlaybackEffect::RequestFullscreen(false)]
    );
}

#[test]
fn test_close_is_idempotent() {
    let mut sync = session(vec![narrated("a", 1, 9.0)]);
    let ticket = start_with_audio(&mut sync);

    let effects = sync.handle(PlaybackEvent::Close, 100);
    assert!(effects.contains(&PlaybackEffect::StopAudio));
    assert_eq!(effects.last(), Some(&PlaybackEffect::Closed));
    assert!(sync.is_closed());
    assert_eq!(sync.next_deadline(), None);

    assert!(sync.handle(PlaybackEvent::Close, 200).is_empty());
    assert!(sync.handle(PlaybackEvent::AudioEnded { ticket }, 300).is_empty());
    assert!(sync.handle(PlaybackEvent::TogglePlay, 400).is_empty());
}

#[test]
fn test_unchanged_audio_is_not_reloaded() {
    let segment = narrated("a", 2, 9.0);
    let mut sync = session(vec![segment.clone()]);
    start_with_audio(&mut sync);

    // Same narration, one more image
    let refreshed = PlaybackSegment::new(
        "a",
        20,
        images(3),
        segment.audio().clone(),
    );
    let effects = sync.handle(PlaybackEvent::SegmentsUpdated(vec![refreshed]), 1_000);
    assert!(!effects.iter().any(|e| matches!(
        e,
        PlaybackEffect::LoadAudio { .. } | PlaybackEffect::StopAudio | PlaybackEffect::PlayAudio { .. }
    )));
    assert_eq!(sync.state(), PlaybackState::PlayingWithAudio);
    assert_eq!(sync.cycle_interval_ms(), Some(3_000));

    // New narration is loaded
    let effects = sync.handle(
        PlaybackEvent::SegmentsUpdated(vec![narrated("a", 3, 6.0)]),
        2_000,
    );
    load_ticket(&effects);
    assert_eq!(sync.state(), PlaybackState::LoadingAudio);
}

#[test]
fn test_replaced_current_segment_restarts_its_timer() {
    let mut sync = session(vec![silent("a", 10), silent("b", 400), silent("c", 50)]);
    sync.handle(PlaybackEvent::Start, 0);
    sync.advance_to(5_000);
    assert_eq!(sync.segment_index(), 1);

    // "a" is deleted, so "c" moves under the current position
    let effects = sync.handle(
        PlaybackEvent::SegmentsUpdated(vec![silent("b", 400), silent("c", 50)]),
        5_200,
    );
    assert!(effects.contains(&PlaybackEffect::SegmentChanged { index: 1 }));
    assert_eq!(sync.segments()[sync.segment_index()].id().as_str(), "c");

    // "c" runs on its own 5 s reading time, not the 24 s left from "b"
    let effects = sync.advance_to(10_199);
    assert!(!effects.contains(&PlaybackEffect::StateChanged(PlaybackState::Finished)));
    let effects = sync.advance_to(10_200);
    assert!(effects.contains(&PlaybackEffect::StateChanged(PlaybackState::Finished)));
}

#[test]
fn test_edited_text_restarts_fallback_timer() {
    let mut sync = session(vec![silent("a", 10), silent("b", 50)]);
    sync.handle(PlaybackEvent::Start, 0);

    // 200 chars now, so 12 s from the edit
    let effects = sync.handle(
        PlaybackEvent::SegmentsUpdated(vec![silent("a", 200), silent("b", 50)]),
        1_000,
    );
    assert!(effects.contains(&PlaybackEffect::SegmentChanged { index: 0 }));
    assert!(!sync.advance_to(12_999).contains(&PlaybackEffect::SegmentChanged { index: 1 }));
    assert!(sync.advance_to(13_000).contains(&PlaybackEffect::SegmentChanged { index: 1 }));
}
