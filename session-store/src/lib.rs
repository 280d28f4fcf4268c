//! # Session store
//!
//! Long-lived authentication sessions keyed by chat-user id. The stored
//! value is the serialized authentication response; callers treat it as an
//! opaque blob and only ever read `accessToken` out of it.
//!
//! ## Modules
//!
//! - [`error`] – [`SessionError`]
//! - [`redis_store`] – [`RedisSessionStore`] backed by a cache service
//! - [`memory_store`] – [`MemorySessionStore`] for tests

mod error;
mod memory_store;
mod redis_store;

pub use error::{Result, SessionError};
pub use memory_store::MemorySessionStore;
pub use redis_store::RedisSessionStore;

use async_trait::async_trait;

/// Async key-value store of serialized sessions keyed by user id.
/// Transport failures surface as [`SessionError::Backend`].
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored session blob, or `None` when the user has none.
    async fn get(&self, user_id: i64) -> Result<Option<String>>;
    /// Stores (or replaces) the session blob for the user.
    async fn set(&self, user_id: i64, payload: &str) -> Result<()>;
    /// Deletes the user's session. Deleting an absent session is not an error.
    async fn delete(&self, user_id: i64) -> Result<()>;
}

/// Cache key for a user's session.
pub(crate) fn session_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_format() {
        assert_eq!(session_key(42), "user:42");
        assert_eq!(session_key(-1), "user:-1");
    }
}
