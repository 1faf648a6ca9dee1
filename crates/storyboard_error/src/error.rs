//! Top-level error wrapper types.

use crate::{
    ArchiveError, AudioError, BuilderError, ConfigError, DecodeError, GenerationError, JsonError,
    PlaybackError, SelectionError,
};

/// Every error the Storyboard crates can raise.
///
/// # Examples
///
/// ```
/// use storyboard_error::{StoryboardError, JsonError};
///
/// let json_err = JsonError::new("Unexpected end of manifest");
/// let err: StoryboardError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryboardErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Raster or payload decode error
    #[from(DecodeError)]
    Decode(DecodeError),
    /// Generation service error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Selection/workbench rejection
    #[from(SelectionError)]
    Selection(SelectionError),
    /// Audio packaging error
    #[from(AudioError)]
    Audio(AudioError),
    /// Playback driver error
    #[from(PlaybackError)]
    Playback(PlaybackError),
    /// Project archive error
    #[from(ArchiveError)]
    Archive(ArchiveError),
}

/// Storyboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyboard_error::{StoryboardResult, ConfigError};
///
/// fn might_fail() -> StoryboardResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyboard Error: {}", _0)]
pub struct StoryboardError(Box<StoryboardErrorKind>);

impl StoryboardError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryboardErrorKind {
        &self.0
    }

    /// The generation error kind, if this is a generation failure.
    pub fn generation_kind(&self) -> Option<&crate::GenerationErrorKind> {
        match self.kind() {
            StoryboardErrorKind::Generation(e) => Some(&e.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to StoryboardErrorKind
impl<T> From<T> for StoryboardError
where
    T: Into<StoryboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyboard operations.
pub type StoryboardResult<T> = std::result::Result<T, StoryboardError>;
