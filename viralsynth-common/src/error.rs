//! Common error types for ViralSynth

use thiserror::Error;

/// Common result type for ViralSynth operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classified failure of a single backend call
///
/// Cloneable so one in-flight response can be handed to every caller that
/// joined the same request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Backend answered with a non-2xx status
    #[error("Request failed with status {0}")]
    Status(u16),

    /// Connection refused, DNS failure, timeout, reset
    #[error("Backend unreachable: {0}")]
    Transport(String),

    /// Body arrived but does not match the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl FetchError {
    /// HTTP status for diagnostics, when the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(code) => Some(*code),
            _ => None,
        }
    }

    /// Message shown to the operator for a failed submission.
    ///
    /// Transport failures surface the underlying transport message as-is.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Transport(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Common error types across the console
#[derive(Error, Debug)]
pub enum Error {
    /// Client-side input rejected before any network call
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A submission is already in flight for this view
    #[error("Busy: {0}")]
    Busy(String),

    /// State machine transition that is not allowed
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Backend call failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
