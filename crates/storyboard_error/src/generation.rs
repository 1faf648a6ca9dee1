//! Generation-service error types.

/// Error conditions reported by the image, speech, and analysis services.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// API key not found in environment
    #[display("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
    /// Access was revoked by an earlier permission failure
    #[display("API access has been revoked; re-authorize before generating")]
    AccessRevoked,
    /// Service rejected the call because of quota or rate limits
    #[display("Rate limited ({}): wait a moment and try again", _0)]
    RateLimited(String),
    /// Service rejected the credentials or model access
    #[display("Permission denied ({}): select a key with access to this model", _0)]
    PermissionDenied(String),
    /// Service rejected the request as malformed
    #[display("Malformed request: {}", _0)]
    MalformedRequest(String),
    /// Any other non-success HTTP status
    #[display("HTTP {} error: {}", status_code, message)]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Network failure before a response arrived
    #[display("Request failed: {}", _0)]
    Transport(String),
    /// Response carried no embedded image
    #[display("No image produced")]
    NoImage,
    /// Response carried no audio payload
    #[display("No audio produced")]
    NoAudio,
    /// Response could not be interpreted
    #[display("Invalid response: {}", _0)]
    InvalidResponse(String),
}

impl GenerationErrorKind {
    /// Classify an HTTP status and body into a kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyboard_error::GenerationErrorKind;
    ///
    /// let kind = GenerationErrorKind::from_status(403, "caller lacks permission");
    /// assert!(kind.is_permission_denied());
    /// ```
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            400 => GenerationErrorKind::MalformedRequest(message),
            401 | 403 => GenerationErrorKind::PermissionDenied(message),
            429 => GenerationErrorKind::RateLimited(message),
            _ => GenerationErrorKind::Api {
                status_code,
                message,
            },
        }
    }

    /// Whether this failure should revoke cached access.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, GenerationErrorKind::PermissionDenied(_))
    }

    /// Whether this failure is a quota/rate-limit rejection.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GenerationErrorKind::RateLimited(_))
    }

    /// Whether the service answered but produced nothing usable.
    pub fn is_no_output(&self) -> bool {
        matches!(
            self,
            GenerationErrorKind::NoImage | GenerationErrorKind::NoAudio
        )
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyboard_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::NoImage);
/// assert!(format!("{}", err).contains("No image produced"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
