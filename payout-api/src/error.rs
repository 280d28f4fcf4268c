use thiserror::Error;

/// Remote API failures, classified by status code so callers can map each
/// class to its own user-facing message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bearer token rejected (HTTP 401).
    #[error("authentication expired")]
    AuthExpired,

    /// Payload rejected (HTTP 422). Carries the itemized validation
    /// messages when the API supplies an array, else the single message.
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    /// Any other non-success HTTP status.
    #[error("remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (DNS, TLS, refused, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
