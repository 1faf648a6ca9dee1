//! Selection and workbench error types.

/// Kinds of selection/workbench rejections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SelectionErrorKind {
    /// No segment with the given id
    #[display("Unknown segment: {}", _0)]
    UnknownSegment(String),
    /// Segment has no composite grid image yet
    #[display("Segment {} has no grid image to select from", _0)]
    NoGrid(String),
    /// A synthesis for the segment is already in flight
    #[display("Segment {} is already generating", _0)]
    Busy(String),
    /// Unknown character or setting
    #[display("Unknown asset: {}", _0)]
    UnknownAsset(String),
}

/// Selection error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{SelectionError, SelectionErrorKind};
///
/// let err = SelectionError::new(SelectionErrorKind::Busy("seg-1".to_string()));
/// assert!(format!("{}", err).contains("already generating"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Selection Error: {} at line {} in {}", kind, line, file)]
pub struct SelectionError {
    /// The kind of error that occurred
    pub kind: SelectionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SelectionError {
    /// Create a new SelectionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SelectionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
