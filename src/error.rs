use reqwest::StatusCode;
use thiserror::Error;

/// A single client-side validation failure, attached to the form field that caused it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors raised by the local key-value store backing saved items and the session
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on storage file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt value under key '{key}': {message}")]
    Corrupt { key: String, message: String },

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Everything that can go wrong talking to the backend or the image CDN
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Image upload failed: {0}")]
    Upload(String),

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Whether the page should offer a retry affordance for this failure.
    ///
    /// Network trouble, timeouts, missing resources and 5xx answers get a retry
    /// button. Auth, validation and other 4xx failures need the user to change
    /// something first, so retrying the same request is not offered.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) | ApiError::NotFound { .. } => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(timeout_secs)
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }

    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string()
        } else {
            body.trim().chars().take(200).collect()
        };
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}
