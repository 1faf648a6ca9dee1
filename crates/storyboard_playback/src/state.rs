//! Playback states, inputs, and outputs.

use crate::PlaybackSegment;
use storyboard_core::AudioAsset;

/// Where a playback session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum PlaybackState {
    /// Not started, or closed
    #[default]
    Idle,
    /// Waiting for the segment's narration to load
    LoadingAudio,
    /// Narration is playing; its end completes the segment
    PlayingWithAudio,
    /// No usable narration; a reading-time timer completes the segment
    PlayingTimerFallback,
    /// The host refused to start audio without a user gesture
    Blocked,
    /// Paused by the user
    Paused,
    /// Past the last segment
    Finished,
}

impl PlaybackState {
    /// Whether the segment is actively progressing.
    pub fn is_playing(self) -> bool {
        matches!(
            self,
            PlaybackState::PlayingWithAudio | PlaybackState::PlayingTimerFallback
        )
    }
}

/// Identifies one audio load. Host notifications carry it back so that
/// notifications about a superseded load are ignored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, derive_more::Display,
)]
#[display("load-{}", _0)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Inputs to the synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Open the session on the first segment, playing
    Start,
    /// User play/pause gesture
    TogglePlay,
    /// Jump to the next segment
    Next,
    /// Jump to the previous segment
    Previous,
    /// Tear the session down
    Close,
    /// Pointer or keyboard activity
    UserActivity,
    /// User asked to enter or leave fullscreen
    ToggleFullscreen,
    /// Host reports the fullscreen mode changed
    FullscreenChanged(bool),
    /// Host finished loading audio
    AudioReady {
        /// Load this refers to
        ticket: LoadTicket,
        /// Duration the host reports, if known
        duration_seconds: Option<f64>,
    },
    /// Host refused to start playback (autoplay policy)
    AudioPlayRejected {
        /// Load this refers to
        ticket: LoadTicket,
    },
    /// Host could not decode or play the audio
    AudioError {
        /// Load this refers to
        ticket: LoadTicket,
        /// Host error text
        message: String,
    },
    /// Audio reached its end
    AudioEnded {
        /// Load this refers to
        ticket: LoadTicket,
    },
    /// The story changed while playing
    SegmentsUpdated(Vec<PlaybackSegment>),
}

/// Outputs for the host to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEffect {
    /// The state machine moved to a new state
    StateChanged(PlaybackState),
    /// A new segment became active
    SegmentChanged {
        /// Segment position
        index: usize,
    },
    /// Display one image of a segment
    ShowImage {
        /// Segment position
        segment: usize,
        /// Image position within the segment
        image: usize,
    },
    /// Replace the audio source with this narration and load it
    LoadAudio {
        /// Ticket to echo back in notifications
        ticket: LoadTicket,
        /// Narration to load
        audio: AudioAsset,
    },
    /// Start or resume the loaded audio
    PlayAudio {
        /// Load being played
        ticket: LoadTicket,
    },
    /// Pause the loaded audio
    PauseAudio,
    /// Stop and release the audio source
    StopAudio,
    /// Show or hide the playback controls
    SetControlsVisible(bool),
    /// Show or hide the media-error indicator
    ShowMediaError(bool),
    /// Ask the host to enter or leave fullscreen
    RequestFullscreen(bool),
    /// The session is over
    Closed,
}
