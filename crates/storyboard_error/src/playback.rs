//! Playback driver error types.

/// Kinds of playback driver failures.
///
/// Media errors inside a session never surface here; the synchronizer
/// recovers from them. These cover the driver's own plumbing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PlaybackErrorKind {
    /// Session has no segments to play
    #[display("Nothing to play: the segment list is empty")]
    EmptySession,
    /// Driver task is no longer running
    #[display("Playback session has shut down")]
    SessionClosed,
    /// Segment index outside the session
    #[display("Segment index {} is out of range", _0)]
    SegmentOutOfRange(usize),
}

/// Playback error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Playback Error: {} at line {} in {}", kind, line, file)]
pub struct PlaybackError {
    /// The kind of error that occurred
    pub kind: PlaybackErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PlaybackError {
    /// Create a new PlaybackError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PlaybackErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
