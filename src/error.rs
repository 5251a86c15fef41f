//! Error taxonomy for fragment loads and process setup.
//!
//! ERROR HANDLING
//! ==============
//! Every `LoadError` is terminal and local to one load attempt. The element
//! renders its `Display` text inline; `Cancelled` is the one variant that is
//! never rendered because it marks a superseded load, not a failed one.

/// Status text used when the server sends no reason phrase.
pub const FALLBACK_STATUS_TEXT: &str = "Error";

/// Failure of a single fragment load attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The element has no source URL configured.
    #[error("Missing required source attribute")]
    MissingSource,

    /// The source resolves to an origin other than the configured one.
    #[error("Cross-origin source rejected: {0}")]
    CrossOrigin(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// Network failure, malformed response, or unusable URL.
    #[error("Failed to load content: {0}")]
    Transport(String),

    /// The load was superseded or the element detached.
    #[error("load cancelled")]
    Cancelled,
}

impl LoadError {
    /// Build an [`LoadError::HttpStatus`], substituting `"Error"` for an
    /// absent or blank reason phrase.
    #[must_use]
    pub fn http_status(status: u16, reason: Option<&str>) -> Self {
        let status_text = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(FALLBACK_STATUS_TEXT)
            .to_owned();
        Self::HttpStatus { status, status_text }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSource | Self::CrossOrigin(_) => ErrorKind::Configuration,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Stable machine-readable code, used in log fields.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSource => "E_MISSING_SOURCE",
            Self::CrossOrigin(_) => "E_CROSS_ORIGIN",
            Self::HttpStatus { .. } => "E_HTTP_STATUS",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Cancelled => "E_CANCELLED",
        }
    }

    /// Whether the failure is shown to the user.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Coarse classification of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected before any network call.
    Configuration,
    HttpStatus,
    Transport,
    Cancelled,
}

/// Errors raised while building the process-level pieces (config, HTTP client).
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
