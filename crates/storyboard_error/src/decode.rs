//! Decode error types for raster and audio input.

/// Kinds of decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DecodeErrorKind {
    /// Raster could not be loaded or decoded
    #[display("Failed to decode image: {}", _0)]
    Image(String),
    /// Raster could not be encoded after extraction
    #[display("Failed to encode image: {}", _0)]
    Encode(String),
    /// Raster is too small to tile into a 3x3 grid
    #[display("Image {}x{} is too small to split into a 3x3 grid", width, height)]
    GridTooSmall {
        /// Source width in pixels
        width: u32,
        /// Source height in pixels
        height: u32,
    },
    /// Cell index outside 0..=8
    #[display("Cell index {} is out of range (expected 0-8)", _0)]
    CellIndex(usize),
    /// Base64 payload could not be decoded
    #[display("Base64 decode error: {}", _0)]
    Base64(String),
}

/// Decode error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{DecodeError, DecodeErrorKind};
///
/// let err = DecodeError::new(DecodeErrorKind::CellIndex(9));
/// assert!(format!("{}", err).contains("out of range"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Decode Error: {} at line {} in {}", kind, line, file)]
pub struct DecodeError {
    /// The kind of error that occurred
    pub kind: DecodeErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DecodeError {
    /// Create a new DecodeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DecodeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
