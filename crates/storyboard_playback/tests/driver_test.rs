// Driver timing under tokio's paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyboard_core::{AudioAsset, ImageData, PlaybackConfig};
use storyboard_playback::{
    LoadTicket, MediaHost, PlaybackDriver, PlaybackEffect, PlaybackEvent, PlaybackHandle,
    PlaybackSegment, PlaybackState, PlaybackSynchronizer,
};

/// Records every effect and acknowledges audio loads immediately.
#[derive(Clone, Default)]
struct RecordingHost {
    effects: Arc<Mutex<Vec<PlaybackEffect>>>,
}

impl RecordingHost {
    fn effects(&self) -> Vec<PlaybackEffect> {
        self.effects.lock().unwrap().clone()
    }

    fn last_ticket(&self) -> LoadTicket {
        self.effects()
            .iter()
            .rev()
            .find_map(|e| match e {
                PlaybackEffect::LoadAudio { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .expect("no audio load requested")
    }

    fn count(&self, predicate: impl Fn(&PlaybackEffect) -> bool) -> usize {
        self.effects().iter().filter(|e| predicate(e)).count()
    }
}

impl MediaHost for RecordingHost {
    fn apply(&mut self, effect: PlaybackEffect, handle: &PlaybackHandle) {
        if let PlaybackEffect::LoadAudio { ticket, audio } = &effect {
            handle
                .send(PlaybackEvent::AudioReady {
                    ticket: *ticket,
                    duration_seconds: Some(audio.duration_seconds()),
                })
                .unwrap();
        }
        self.effects.lock().unwrap().push(effect);
    }
}

fn story_segments() -> Vec<PlaybackSegment> {
    vec![
        PlaybackSegment::new(
            "opening",
            30,
            (0..3).map(|i| ImageData::png(vec![i])).collect(),
            Some(AudioAsset::new(vec![0u8; 44], 9.0)),
        ),
        PlaybackSegment::new("closing", 50, vec![ImageData::png(vec![9])], None),
    ]
}

#[tokio::test(start_paused = true)]
async fn test_driver_follows_virtual_time() {
    let host = RecordingHost::default();
    let sync = PlaybackSynchronizer::new(story_segments(), PlaybackConfig::default()).unwrap();
    let (handle, task) = PlaybackDriver::spawn(sync, host.clone());

    tokio::time::sleep(Duration::from_millis(9_001)).await;
    let shown = host.count(|e| matches!(e, PlaybackEffect::ShowImage { segment: 0, .. }));
    // Initial image plus exactly three advances
    assert_eq!(shown, 4);
    assert!(host
        .effects()
        .contains(&PlaybackEffect::StateChanged(PlaybackState::PlayingWithAudio)));

    handle
        .send(PlaybackEvent::AudioEnded {
            ticket: host.last_ticket(),
        })
        .unwrap();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(host
        .effects()
        .contains(&PlaybackEffect::SegmentChanged { index: 1 }));

    // 50 characters on the fallback timer
    tokio::time::sleep(Duration::from_millis(4_990)).await;
    assert!(!host
        .effects()
        .contains(&PlaybackEffect::StateChanged(PlaybackState::Finished)));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(host
        .effects()
        .contains(&PlaybackEffect::StateChanged(PlaybackState::Finished)));

    handle.close().unwrap();
    let host = task.await.unwrap();
    assert_eq!(host.effects().last(), Some(&PlaybackEffect::Closed));

    // The driver is gone; closing again is still fine
    handle.close().unwrap();
    assert!(handle.toggle_play().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_stale_ticket_from_previous_segment_is_ignored() {
    let host = RecordingHost::default();
    let sync = PlaybackSynchronizer::new(story_segments(), PlaybackConfig::default()).unwrap();
    let (handle, task) = PlaybackDriver::spawn(sync, host.clone());

    tokio::time::sleep(Duration::from_millis(10)).await;
    let stale = host.last_ticket();
    handle.next().unwrap();
    handle.previous().unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_ne!(host.last_ticket(), stale);

    handle.send(PlaybackEvent::AudioEnded { ticket: stale }).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let segment_changes = host.count(|e| matches!(e, PlaybackEffect::SegmentChanged { .. }));
    assert_eq!(segment_changes, 3);

    handle.close().unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_dropping_every_handle_closes_the_session() {
    let host = RecordingHost::default();
    let segments = vec![PlaybackSegment::new(
        "only",
        50,
        vec![ImageData::png(vec![1])],
        Some(AudioAsset::new(vec![0u8; 44], 9.0)),
    )];
    let sync = PlaybackSynchronizer::new(segments, PlaybackConfig::default()).unwrap();
    let (handle, task) = PlaybackDriver::spawn(sync, host.clone());

    tokio::time::sleep(Duration::from_millis(10)).await;
    drop(handle);

    let host = tokio::time::timeout(Duration::from_secs(3_600), task)
        .await
        .expect("driver kept running without handles")
        .unwrap();
    let effects = host.effects();
    assert!(effects.contains(&PlaybackEffect::StopAudio));
    assert_eq!(effects.last(), Some(&PlaybackEffect::Closed));
}
