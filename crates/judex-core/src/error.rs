//! Error types for the judex-core library.

use std::time::Duration;

use thiserror::Error;

/// Main error type for the judex library.
#[derive(Error, Debug)]
pub enum JudexError {
    /// Browser session error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Case page loading error.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Output error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Linked document error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown case class code.
    #[error("invalid case class: {0}")]
    InvalidClass(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by a browser session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The browser process could not be started.
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// The browser exited with an error while rendering.
    #[error("render failed: {0}")]
    Render(String),

    /// Rendering did not finish in time.
    #[error("render timed out after {0:?}")]
    Timeout(Duration),

    /// `page_source` was called before `navigate`.
    #[error("no page loaded")]
    NoPage,

    /// Transport error talking to a remote browser.
    #[error("network error: {0}")]
    Network(String),

    /// Remote browser answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Network(err.to_string())
    }
}

/// Errors raised while loading a case page.
///
/// "Record not found" is not an error: see [`crate::loader::LoadOutcome`].
#[derive(Error, Debug)]
pub enum LoadError {
    /// Access denied by the portal.
    #[error("403 Forbidden - access denied")]
    AccessDenied,

    /// Anti-bot challenge page.
    #[error("CAPTCHA detected")]
    BotChallenge,

    /// Gateway error page.
    #[error("502 Bad Gateway")]
    BadGateway,

    /// A required anchor never appeared.
    #[error("anchor {anchor} not found after {waited:?}")]
    AnchorTimeout { anchor: &'static str, waited: Duration },

    /// A required fragment is missing from a loaded page.
    #[error("required anchor {0} missing")]
    MissingAnchor(&'static str),

    /// Invalid target URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Browser session failure.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl LoadError {
    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::AccessDenied
            | LoadError::BotChallenge
            | LoadError::BadGateway
            | LoadError::AnchorTimeout { .. }
            | LoadError::MissingAnchor(_) => true,
            LoadError::InvalidUrl(_) => false,
            LoadError::Session(e) => !matches!(e, SessionError::Launch(_)),
        }
    }
}

/// Errors related to case field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Target element is not in the document.
    #[error("element not found: {0}")]
    MissingElement(String),

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Errors related to writing or reading output files.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding or decoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output file lacks the identity column.
    #[error("no processo_id column in {0}")]
    MissingIdColumn(String),

    /// No output format was enabled.
    #[error("no output format enabled")]
    NoFormat,
}

/// Errors related to linked PDF/RTF documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Download failed.
    #[error("download failed: {0}")]
    Http(String),

    /// Server answered with a non-success status.
    #[error("download failed with status {0}")]
    Status(u16),

    /// Neither PDF nor RTF.
    #[error("unsupported document format")]
    UnsupportedFormat,

    /// PDF text extraction failed.
    #[error("failed to extract PDF text: {0}")]
    Pdf(String),

    /// Document decoded to no text.
    #[error("document has no text")]
    Empty,
}

impl From<reqwest::Error> for DocumentError {
    fn from(err: reqwest::Error) -> Self {
        DocumentError::Http(err.to_string())
    }
}

impl DocumentError {
    /// Whether another download attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            DocumentError::Http(_) => true,
            DocumentError::Status(code) => *code >= 500 || *code == 429,
            _ => false,
        }
    }
}

/// Result type for the judex library.
pub type Result<T> = std::result::Result<T, JudexError>;
