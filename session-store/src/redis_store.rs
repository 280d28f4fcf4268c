//! Redis-backed [`SessionStore`]. Keys are `user:{id}`; values are the
//! serialized authentication response. No TTL is set — expiry is detected
//! reactively from a 401 on a remote call.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use crate::error::Result;
use crate::{session_key, SessionStore};

/// [`SessionStore`] over a cache service connection.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    /// Connects to the cache service at `url` (e.g. `redis://localhost:6379`).
    /// The connection manager reconnects transparently on failure.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, user_id: i64) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(session_key(user_id)).await?;
        debug!(user_id, found = value.is_some(), "session get");
        Ok(value)
    }

    async fn set(&self, user_id: i64, payload: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(session_key(user_id), payload).await?;
        debug!(user_id, "session stored");
        Ok(())
    }

    async fn delete(&self, user_id: i64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(session_key(user_id)).await?;
        debug!(user_id, "session deleted");
        Ok(())
    }
}
