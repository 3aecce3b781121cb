use thiserror::Error;

/// Errors returned by video generator operations.
#[derive(Error, Debug)]
pub enum VeoError {
    /// The server returned a non-success HTTP status.
    #[error("server returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response from the server was missing expected fields.
    #[error("{0}")]
    InvalidResponse(String),

    /// The backend reported a failure for this operation. The message is
    /// surfaced verbatim and the operation is not retried.
    #[error("{0}")]
    Backend(String),

    /// Input was rejected locally before any request was issued.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Polling was cancelled via the cancellation flag.
    #[error("polling was cancelled")]
    Cancelled,

    /// An overlay surface operation failed.
    #[error("overlay error: {0}")]
    Overlay(String),

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read a local file (prompts upload, video save).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, VeoError>;
