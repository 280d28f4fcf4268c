//! In-memory [`SessionStore`] for tests and local runs without a cache
//! service.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::SessionStore;

#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<HashMap<i64, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: i64) -> Result<Option<String>> {
        Ok(self.inner.lock().await.get(&user_id).cloned())
    }

    async fn set(&self, user_id: i64, payload: &str) -> Result<()> {
        self.inner.lock().await.insert(user_id, payload.to_string());
        Ok(())
    }

    async fn delete(&self, user_id: i64) -> Result<()> {
        self.inner.lock().await.remove(&user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete_roundtrip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(1).await.unwrap(), None);

        store.set(1, r#"{"accessToken":"T"}"#).await.unwrap();
        assert_eq!(
            store.get(1).await.unwrap().as_deref(),
            Some(r#"{"accessToken":"T"}"#)
        );

        store.delete(1).await.unwrap();
        assert_eq!(store.get(1).await.unwrap(), None);

        // Deleting again is a no-op.
        store.delete(1).await.unwrap();
    }
}
