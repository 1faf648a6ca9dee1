//! Project archive error types.

/// Kinds of archive errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ArchiveErrorKind {
    /// Failed to create or write the archive file
    #[display("Failed to write archive: {}", _0)]
    Write(String),
    /// Failed to open or read the archive file
    #[display("Failed to read archive: {}", _0)]
    Read(String),
    /// Archive lacks the project manifest
    #[display("Archive is missing its project manifest ({})", _0)]
    MissingManifest(String),
    /// Manifest could not be parsed
    #[display("Invalid project manifest: {}", _0)]
    InvalidManifest(String),
}

/// Archive error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{ArchiveError, ArchiveErrorKind};
///
/// let err = ArchiveError::new(ArchiveErrorKind::MissingManifest("project.json".to_string()));
/// assert!(format!("{}", err).contains("project.json"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Archive Error: {} at line {} in {}", kind, line, file)]
pub struct ArchiveError {
    /// The kind of error that occurred
    pub kind: ArchiveErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ArchiveError {
    /// Create a new ArchiveError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ArchiveErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
