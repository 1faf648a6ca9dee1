//! Headless playback on a virtual clock.

use crate::{
    LoadTicket, PlaybackEffect, PlaybackEvent, PlaybackSegment, PlaybackState,
    PlaybackSynchronizer,
};
use std::collections::VecDeque;
use storyboard_core::PlaybackConfig;
use storyboard_error::PlaybackError;

/// An effect stamped with the virtual time it was emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEffect {
    /// Milliseconds since the session started
    pub at_ms: u64,
    /// The effect
    pub effect: PlaybackEffect,
}

/// Play a session start to finish without a real host.
///
/// Audio loads instantly and plays for exactly its packaged duration; the
/// simulation stops when playback finishes or the clock passes `limit_ms`.
pub fn simulate(
    segments: Vec<PlaybackSegment>,
    config: PlaybackConfig,
    limit_ms: u64,
) -> Result<Vec<TimedEffect>, PlaybackError> {
    let mut sync = PlaybackSynchronizer::new(segments, config)?;
    let mut host = VirtualHost::default();
    let mut log = Vec::new();
    let mut now = 0;
    host.pending.push_back(PlaybackEvent::Start);

    loop {
        while let Some(event) = host.pending.pop_front() {
            let effects = sync.handle(event, now);
            host.record(effects, now, &mut log);
        }
        if sync.state() == PlaybackState::Finished || sync.is_closed() {
            break;
        }

        let next = [sync.next_deadline(), host.audio_end.map(|(end, _)| end)]
            .into_iter()
            .flatten()
            .min();
        let Some(next) = next.filter(|t| *t <= limit_ms) else {
            break;
        };
        now = next;

        let effects = sync.advance_to(now);
        host.record(effects, now, &mut log);
        if let Some((end, ticket)) = host.audio_end {
            if end <= now {
                host.audio_end = None;
                host.pending.push_back(PlaybackEvent::AudioEnded { ticket });
            }
        }
    }
    Ok(log)
}

#[derive(Debug, Default)]
struct VirtualHost {
    pending: VecDeque<PlaybackEvent>,
    loaded: Option<(LoadTicket, u64)>,
    audio_end: Option<(u64, LoadTicket)>,
}

impl VirtualHost {
    fn record(&mut self, effects: Vec<PlaybackEffect>, now: u64, log: &mut Vec<TimedEffect>) {
        for effect in effects {
            match &effect {
                PlaybackEffect::LoadAudio { ticket, audio } => {
                    let duration_ms = (audio.duration_seconds() * 1000.0).round() as u64;
                    self.loaded = Some((*ticket, duration_ms));
                    self.audio_end = None;
                    self.pending.push_back(PlaybackEvent::AudioReady {
                        ticket: *ticket,
                        duration_seconds: Some(audio.duration_seconds()),
                    });
                }
                PlaybackEffect::PlayAudio { ticket } => {
                    if let Some((loaded, duration_ms)) = self.loaded {
                        if loaded == *ticket {
                            self.audio_end = Some((now + duration_ms, loaded));
                        }
                    }
                }
                PlaybackEffect::PauseAudio | PlaybackEffect::StopAudio => {
                    self.audio_end = None;
                }
                _ => {}
            }
            log.push(TimedEffect { at_ms: now, effect });
        }
    }
}
