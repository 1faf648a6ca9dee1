//! Clock-driven playback state machine.

use crate::{LoadTicket, PlaybackEffect, PlaybackEvent, PlaybackSegment, PlaybackState};
use storyboard_core::{AudioSourceId, PlaybackConfig};
use storyboard_error::{PlaybackError, PlaybackErrorKind};
use tracing::{debug, info, warn};

/// How the active segment decides when it is complete.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SegmentMode {
    /// Completion is the audio-ended notification
    Audio {
        ready: bool,
        duration_ms: Option<u64>,
    },
    /// Completion is a timer; `remaining_ms` is kept across pauses
    Fallback { remaining_ms: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    Cycle,
    Segment,
    Indicator,
    Controls,
}

/// Sequences segments, narration, image cycling, and controls for one
/// playback session.
///
/// Nothing here reads a clock: every input carries `now_ms`, and timers are
/// absolute deadlines fired by [`advance_to`](Self::advance_to).
///
/// # Examples
///
/// ```
/// use storyboard_core::PlaybackConfig;
/// use storyboard_playback::{
///     PlaybackEffect, PlaybackEvent, PlaybackSegment, PlaybackState, PlaybackSynchronizer,
/// };
///
/// let segment = PlaybackSegment::new("seg-1", 50, Vec::new(), None);
/// let mut sync = PlaybackSynchronizer::new(vec![segment], PlaybackConfig::default()).unwrap();
///
/// sync.handle(PlaybackEvent::Start, 0);
/// assert_eq!(sync.state(), PlaybackState::PlayingTimerFallback);
/// assert_eq!(sync.next_deadline(), Some(3_000)); // controls hide first
///
/// let effects = sync.advance_to(5_000);
/// assert!(effects.contains(&PlaybackEffect::StateChanged(PlaybackState::Finished)));
/// ```
#[derive(Debug)]
pub struct PlaybackSynchronizer {
    config: PlaybackConfig,
    segments: Vec<PlaybackSegment>,
    index: usize,
    state: PlaybackState,
    playing: bool,
    mode: SegmentMode,
    image_position: usize,
    ticket: LoadTicket,
    loaded_source: Option<AudioSourceId>,
    controls_visible: bool,
    media_error: bool,
    fullscreen: bool,
    closed: bool,
    segment_deadline: Option<u64>,
    cycle_deadline: Option<u64>,
    controls_deadline: Option<u64>,
    indicator_deadline: Option<u64>,
}

impl PlaybackSynchronizer {
    /// Create an idle session over `segments`.
    #[track_caller]
    pub fn new(
        segments: Vec<PlaybackSegment>,
        config: PlaybackConfig,
    ) -> Result<Self, PlaybackError> {
        if segments.is_empty() {
            return Err(PlaybackError::new(PlaybackErrorKind::EmptySession));
        }
        Ok(Self {
            config,
            segments,
            index: 0,
            state: PlaybackState::Idle,
            playing: false,
            mode: SegmentMode::Fallback { remaining_ms: 0 },
            image_position: 0,
            ticket: LoadTicket::default(),
            loaded_source: None,
            controls_visible: true,
            media_error: false,
            fullscreen: false,
            closed: false,
            segment_deadline: None,
            cycle_deadline: None,
            controls_deadline: None,
            indicator_deadline: None,
        })
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Position of the active segment.
    pub fn segment_index(&self) -> usize {
        self.index
    }

    /// Position of the displayed image within the active segment.
    pub fn image_position(&self) -> usize {
        self.image_position
    }

    /// The user's play intent.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether controls are showing.
    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    /// Whether the media-error indicator is showing.
    pub fn media_error_visible(&self) -> bool {
        self.media_error
    }

    /// Whether the host is in fullscreen mode.
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Whether the session was closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The segments being played.
    pub fn segments(&self) -> &[PlaybackSegment] {
        &self.segments
    }

    /// Earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.next_timer().map(|(deadline, _)| deadline)
    }

    /// Current image-cycle interval for the active segment, if it cycles.
    pub fn cycle_interval_ms(&self) -> Option<u64> {
        let count = self.segments[self.index].images().len();
        if count < 2 {
            return None;
        }
        let effective = match self.mode {
            SegmentMode::Audio {
                duration_ms: Some(duration),
                ..
            } => duration,
            _ => self.config.default_cycle_ms,
        };
        Some((effective / count as u64).max(1))
    }

    /// Apply one input at `now_ms`. Due timers are fired first.
    pub fn handle(&mut self, event: PlaybackEvent, now_ms: u64) -> Vec<PlaybackEffect> {
        let mut effects = self.advance_to(now_ms);
        if self.closed {
            return effects;
        }

        match event {
            PlaybackEvent::Start => self.start(now_ms, &mut effects),
            PlaybackEvent::TogglePlay => self.toggle_play(now_ms, &mut effects),
            PlaybackEvent::Next => {
                if self.state != PlaybackState::Idle && self.index + 1 < self.segments.len() {
                    self.enter_segment(self.index + 1, now_ms, &mut effects);
                }
            }
            PlaybackEvent::Previous => {
                if self.state != PlaybackState::Idle && self.index > 0 {
                    self.enter_segment(self.index - 1, now_ms, &mut effects);
                }
            }
            PlaybackEvent::Close => self.close(&mut effects),
            PlaybackEvent::UserActivity => {
                self.show_controls(&mut effects);
                self.schedule_hide(now_ms);
            }
            PlaybackEvent::ToggleFullscreen => {
                effects.push(PlaybackEffect::RequestFullscreen(!self.fullscreen));
            }
            PlaybackEvent::FullscreenChanged(fullscreen) => self.fullscreen = fullscreen,
            PlaybackEvent::AudioReady {
                ticket,
                duration_seconds,
            } => self.audio_ready(ticket, duration_seconds, now_ms, &mut effects),
            PlaybackEvent::AudioPlayRejected { ticket } => {
                self.audio_rejected(ticket, &mut effects)
            }
            PlaybackEvent::AudioError { ticket, message } => {
                self.audio_error(ticket, &message, now_ms, &mut effects)
            }
            PlaybackEvent::AudioEnded { ticket } => {
                if self.is_current(ticket) && self.state == PlaybackState::PlayingWithAudio {
                    self.complete_segment(now_ms, &mut effects);
                }
            }
            PlaybackEvent::SegmentsUpdated(segments) => {
                self.update_segments(segments, now_ms, &mut effects)
            }
        }
        effects
    }

    /// Jump to a segment by position.
    pub fn jump_to(
        &mut self,
        index: usize,
        now_ms: u64,
    ) -> Result<Vec<PlaybackEffect>, PlaybackError> {
        if self.closed {
            return Err(PlaybackError::new(PlaybackErrorKind::SessionClosed));
        }
        if index >= self.segments.len() {
            return Err(PlaybackError::new(PlaybackErrorKind::SegmentOutOfRange(
                index,
            )));
        }
        let mut effects = self.advance_to(now_ms);
        if self.state == PlaybackState::Idle {
            self.playing = true;
            self.schedule_hide(now_ms);
        }
        if self.state == PlaybackState::Idle || index != self.index {
            self.enter_segment(index, now_ms, &mut effects);
        }
        Ok(effects)
    }

    /// Fire every timer due at or before `now_ms`, in deadline order.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<PlaybackEffect> {
        let mut effects = Vec::new();
        while let Some((deadline, timer)) = self.next_timer().filter(|(d, _)| *d <= now_ms) {
            match timer {
                Timer::Cycle => self.advance_image(deadline, &mut effects),
                Timer::Segment => {
                    self.segment_deadline = None;
                    self.complete_segment(deadline, &mut effects);
                }
                Timer::Indicator => {
                    self.indicator_deadline = None;
                    if self.media_error {
                        self.media_error = false;
                        effects.push(PlaybackEffect::ShowMediaError(false));
                    }
                }
                Timer::Controls => {
                    self.controls_deadline = None;
                    if self.playing && self.controls_visible {
                        self.controls_visible = false;
                        effects.push(PlaybackEffect::SetControlsVisible(false));
                    }
                }
            }
        }
        effects
    }

    fn next_timer(&self) -> Option<(u64, Timer)> {
        [
            (self.cycle_deadline, Timer::Cycle),
            (self.segment_deadline, Timer::Segment),
            (self.indicator_deadline, Timer::Indicator),
            (self.controls_deadline, Timer::Controls),
        ]
        .into_iter()
        .filter_map(|(deadline, timer)| deadline.map(|d| (d, timer)))
        .min_by_key(|(deadline, _)| *deadline)
    }

    fn set_state(&mut self, state: PlaybackState, effects: &mut Vec<PlaybackEffect>) {
        if self.state != state {
            debug!(from = %self.state, to = %state, segment = self.index, "Playback transition");
            self.state = state;
            effects.push(PlaybackEffect::StateChanged(state));
        }
    }

    fn start(&mut self, now_ms: u64, effects: &mut Vec<PlaybackEffect>) {
        if self.state != PlaybackState::Idle {
            return;
        }
        info!(segments = self.segments.len(), "Starting playback");
        self.playing = true;
        self.enter_segment(0, now_ms, effects);
        self.schedule_hide(now_ms);
    }

    fn enter_segment(&mut self, index: usize, now_ms: u64, effects: &mut Vec<PlaybackEffect>) {
        self.index = index;
        self.segment_deadline = None;
        self.cycle_deadline = None;
        self.image_position = 0;
        if self.media_error {
            self.media_error = false;
            self.indicator_deadline = None;
            effects.push(PlaybackEffect::ShowMediaError(false));
        }

        effects.push(PlaybackEffect::SegmentChanged { index });
        let segment = &self.segments[index];
        let (has_images, text_len, audio) = (
            !segment.images().is_empty(),
            *segment.text_len(),
            segment.audio().clone(),
        );
        if has_images {
            effects.push(PlaybackEffect::ShowImage {
                segment: index,
                image: 0,
            });
        }

        match audio {
            Some(audio) => {
                self.ticket = self.ticket.next();
                self.loaded_source = Some(audio.id());
                self.mode = SegmentMode::Audio {
                    ready: false,
                    duration_ms: None,
                };
                effects.push(PlaybackEffect::LoadAudio {
                    ticket: self.ticket,
                    audio,
                });
                let state = if self.playing {
                    PlaybackState::LoadingAudio
                } else {
                    PlaybackState::Paused
                };
                self.set_state(state, effects);
            }
            None => {
                self.release_audio(effects);
                let duration = self.config.fallback_duration_ms(text_len);
                self.mode = SegmentMode::Fallback {
                    remaining_ms: duration,
                };
                if self.playing {
                    self.segment_deadline = Some(now_ms + duration);
                    self.set_state(PlaybackState::PlayingTimerFallback, effects);
                    self.start_cycle(now_ms);
                } else {
                    self.set_state(PlaybackState::Paused, effects);
                }
            }
        }
    }

    fn release_audio(&mut self, effects: &mut Vec<PlaybackEffect>) {
        if self.loaded_source.take().is_some() {
            self.ticket = self.ticket.next();
            effects.push(PlaybackEffect::StopAudio);
        }
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        let current = self.loaded_source.is_some() && ticket == self.ticket;
        if !current {
            debug!(%ticket, current = %self.ticket, "Ignoring stale audio notification");
        }
        current
    }

    fn start_cycle(&mut self, now_ms: u64) {
        self.cycle_deadline = self.cycle_interval_ms().map(|interval| now_ms + interval);
    }

    fn advance_image(&mut self, deadline: u64, effects: &mut Vec<PlaybackEffect>) {
        let count = self.segments[self.index].images().len();
        match self.cycle_interval_ms() {
            Some(interval) if self.state.is_playing() => {
                self.image_position = (self.image_position + 1) % count;
                effects.push(PlaybackEffect::ShowImage {
                    segment: self.index,
                    image: self.image_position,
                });
                self.cycle_deadline = Some(deadline + interval);
            }
            _ => self.cycle_deadline = None,
        }
    }

    fn complete_segment(&mut self, now_ms: u64, effects: &mut Vec<PlaybackEffect>) {
        if self.index + 1 < self.segments.len() {
            self.enter_segment(self.index + 1, now_ms, effects);
        } else {
            info!("Playback finished");
            self.playing = false;
            self.segment_deadline = None;
            self.cycle_deadline = None;
            self.set_state(PlaybackState::Finished, effects);
            self.show_controls(effects);
        }
    }

    fn toggle_play(&mut self, now_ms: u64, effects: &mut Vec<PlaybackEffect>) {
        match self.state {
            PlaybackState::Idle => {}
            PlaybackState::Finished => {
                self.playing = true;
                self.enter_segment(0, now_ms, effects);
                self.schedule_hide(now_ms);
            }
            PlaybackState::LoadingAudio
            | PlaybackState::PlayingWithAudio
            | PlaybackState::PlayingTimerFallback => self.pause(now_ms, effects),
            PlaybackState::Paused | PlaybackState::Blocked => self.resume(now_ms, effects),
        }
    }

    fn pause(&mut self, now_ms: u64, effects: &mut Vec<PlaybackEffect>) {
        self.playing = false;
        match self.mode {
            SegmentMode::Audio { .. } if self.state == PlaybackState::PlayingWithAudio => {
                effects.push(PlaybackEffect::PauseAudio);
            }
            SegmentMode::Fallback { .. } => {
                let remaining_ms = self
                    .segment_deadline
                    .map(|deadline| deadline.saturating_sub(now_ms))
                    .unwrap_or(0);
                self.mode = SegmentMode::Fallback { remaining_ms };
            }
            SegmentMode::Audio { .. } => {}
        }
        self.segment_deadline = None;
        self.cycle_deadline = None;
        self.set_state(PlaybackState::Paused, effects);
        self.show_controls(effects);
    }

    fn resume(&mut self, now_ms: u64, effects: &mut Vec<PlaybackEffect>) {
        self.playing = true;
        match self.mode {
            SegmentMode::Audio { ready: true, .. } => {
                effects.push(PlaybackEffect::PlayAudio {
                    ticket: self.ticket,
                });
                self.set_state(PlaybackState::PlayingWithAudio, effects);
                self.start_cycle(now_ms);
            }
            SegmentMode::Audio { ready: false, .. } => {
                self.set_state(PlaybackState::LoadingAudio, effects);
            }
            SegmentMode::Fallback { remaining_ms } => {
                self.segment_deadline = Some(now_ms + remaining_ms);
                self.set_state(PlaybackState::PlayingTimerFallback, effects);
                self.start_cycle(now_ms);
            }
        }
        self.schedule_hide(now_ms);
    }

    fn audio_ready(
        &mut self,
        ticket: LoadTicket,
        duration_seconds: Option<f64>,
        now_ms: u64,
        effects: &mut Vec<PlaybackEffect>,
    ) {
        if !self.is_current(ticket) || !matches!(self.mode, SegmentMode::Audio { .. }) {
            return;
        }
        let duration_ms = duration_seconds
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| (d * 1000.0).round() as u64);
        self.mode = SegmentMode::Audio {
            ready: true,
            duration_ms,
        };

        if self.playing {
            effects.push(PlaybackEffect::PlayAudio { ticket });
            self.set_state(PlaybackState::PlayingWithAudio, effects);
            self.start_cycle(now_ms);
        } else {
            self.set_state(PlaybackState::Paused, effects);
        }
    }

    fn audio_rejected(&mut self, ticket: LoadTicket, effects: &mut Vec<PlaybackEffect>) {
        if !self.is_current(ticket) || self.state != PlaybackState::PlayingWithAudio {
            return;
        }
        warn!(segment = self.index, "Host blocked audio playback, waiting for a user gesture");
        self.playing = false;
        self.cycle_deadline = None;
        self.set_state(PlaybackState::Blocked, effects);
        self.show_controls(effects);
    }

    fn audio_error(
        &mut self,
        ticket: LoadTicket,
        message: &str,
        now_ms: u64,
        effects: &mut Vec<PlaybackEffect>,
    ) {
        if !self.is_current(ticket) || !matches!(self.mode, SegmentMode::Audio { .. }) {
            return;
        }
        warn!(segment = self.index, error = message, "Audio failed, falling back to timer");
        self.release_audio(effects);

        let duration = self
            .config
            .fallback_duration_ms(*self.segments[self.index].text_len());
        self.mode = SegmentMode::Fallback {
            remaining_ms: duration,
        };
        self.media_error = true;
        self.indicator_deadline = Some(now_ms + self.config.media_error_indicator_ms);
        effects.push(PlaybackEffect::ShowMediaError(true));

        if self.playing {
            self.segment_deadline = Some(now_ms + duration);
            self.set_state(PlaybackState::PlayingTimerFallback, effects);
            self.start_cycle(now_ms);
        } else {
            self.set_state(PlaybackState::Paused, effects);
        }
    }

    fn update_segments(
        &mut self,
        segments: Vec<PlaybackSegment>,
        now_ms: u64,
        effects: &mut Vec<PlaybackEffect>,
    ) {
        if segments.is_empty() {
            warn!("Ignoring update with no segments");
            return;
        }
        let previous = &self.segments[self.index];
        let previous_id = previous.id().clone();
        let previous_text_len = *previous.text_len();
        let previous_source = previous.audio().as_ref().map(|a| a.id());
        let previous_images = previous.images().len();
        self.segments = segments;

        if self.state == PlaybackState::Idle {
            self.index = 0;
            return;
        }

        let index = self.index.min(self.segments.len() - 1);
        let current = &self.segments[index];
        let source = current.audio().as_ref().map(|a| a.id());
        // Without narration the timer depends on the text length.
        let timer_changed = source.is_none() && *current.text_len() != previous_text_len;
        if index != self.index
            || *current.id() != previous_id
            || source != previous_source
            || timer_changed
        {
            self.enter_segment(index, now_ms, effects);
            return;
        }

        // Same segment and narration: keep audio running, refresh images only
        let count = self.segments[index].images().len();
        if count != previous_images {
            if self.image_position >= count {
                self.image_position = 0;
            }
            if count > 0 {
                effects.push(PlaybackEffect::ShowImage {
                    segment: index,
                    image: self.image_position,
                });
            }
            if self.state.is_playing() {
                self.start_cycle(now_ms);
            }
        }
    }

    fn show_controls(&mut self, effects: &mut Vec<PlaybackEffect>) {
        self.controls_deadline = None;
        if !self.controls_visible {
            self.controls_visible = true;
            effects.push(PlaybackEffect::SetControlsVisible(true));
        }
    }

    fn schedule_hide(&mut self, now_ms: u64) {
        if self.playing {
            self.controls_deadline = Some(now_ms + self.config.controls_hide_delay_ms);
        }
    }

    fn close(&mut self, effects: &mut Vec<PlaybackEffect>) {
        info!(segment = self.index, "Closing playback");
        self.closed = true;
        self.playing = false;
        self.loaded_source = None;
        self.ticket = self.ticket.next();
        self.segment_deadline = None;
        self.cycle_deadline = None;
        self.controls_deadline = None;
        self.indicator_deadline = None;
        effects.push(PlaybackEffect::StopAudio);
        self.set_state(PlaybackState::Idle, effects);
        effects.push(PlaybackEffect::Closed);
    }
}
