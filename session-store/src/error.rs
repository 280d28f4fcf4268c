use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session backend error: {0}")]
    Backend(String),
}

impl From<redis::RedisError> for SessionError {
    fn from(e: redis::RedisError) -> Self {
        SessionError::Backend(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
