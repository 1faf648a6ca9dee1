//! Audio packaging error types.

/// Kinds of audio packaging errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AudioErrorKind {
    /// Raw buffer was empty
    #[display("Audio buffer is empty")]
    EmptyBuffer,
    /// Payload too large for a RIFF container
    #[display("Audio payload of {} bytes exceeds the container limit", _0)]
    TooLarge(usize),
    /// Sample rate of zero or otherwise unusable
    #[display("Invalid sample rate: {}", _0)]
    InvalidSampleRate(u32),
}

/// Audio error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{AudioError, AudioErrorKind};
///
/// let err = AudioError::new(AudioErrorKind::EmptyBuffer);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Audio Error: {} at line {} in {}", kind, line, file)]
pub struct AudioError {
    /// The kind of error that occurred
    pub kind: AudioErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AudioError {
    /// Create a new AudioError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AudioErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
