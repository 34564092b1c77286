//! Error types shared by the controllers and their browser adapters.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal to the page. Controllers log these and leave the
//! affected control in a retryable state; the rest of the page keeps working.

/// Failure while touching the document.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("browser window is unavailable")]
    NoWindow,
    #[error("document is unavailable")]
    NoDocument,
    #[error("missing element: {0}")]
    MissingElement(String),
    /// A `web-sys` call threw; the payload is the debug rendering of the JS value.
    #[error("DOM call failed: {0}")]
    Js(String),
}

/// Failure while reading or writing the durable preference store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("preference storage is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write preference {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Failure of a task action request before a usable response was decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("{status} {status_text}")]
    Status { status: u16, status_text: String },
}

/// Failure while parsing the page configuration block.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported auto-refresh interval: {0}s (expected 5, 10, 30 or 60)")]
    InvalidInterval(u64),
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("narrow viewport breakpoint must be positive, got {0}")]
    InvalidBreakpoint(f64),
    /// An id or class name that `classList` / `getElementById` cannot take as one token.
    #[error("{field} must be a single non-empty token, got {value:?}")]
    InvalidToken { field: &'static str, value: String },
}
