//! Session guard shared by every authenticated operation: look up the
//! stored session payload and extract the bearer token from it.

use crate::core::types::{Action, Button, Command, Reply};
use serde::Deserialize;
use session_store::SessionStore;
use tracing::warn;

/// The slice of the stored session payload the guard needs. The payload is
/// the full authentication response as returned at login; everything else
/// in it is carried opaquely.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPayload {
    access_token: String,
}

fn not_logged_in() -> Reply {
    Reply::text("You need to be logged in to use this feature.\nPlease use /login to authenticate.").with_keyboard(vec![vec![Button::action(
        "🔑 Login",
        &Action::Menu(Command::Login),
    )]])
}

/// Resolves the bearer token for a user, or the reply to show instead.
/// A corrupt payload is reported but left in place.
pub async fn resolve_token(sessions: &dyn SessionStore, user_id: i64) -> Result<String, Reply> {
    let payload = match sessions.get(user_id).await {
        Ok(p) => p,
        Err(e) => {
            warn!(user_id, error = %e, "step: session lookup failed");
            return Err(Reply::text(
                "⚠️ Session storage is temporarily unavailable. Please try again in a moment.",
            ));
        }
    };

    let Some(payload) = payload else {
        return Err(not_logged_in());
    };

    match serde_json::from_str::<SessionPayload>(&payload) {
        Ok(session) => Ok(session.access_token),
        Err(e) => {
            warn!(user_id, error = %e, "step: stored session payload unreadable");
            Err(Reply::text(
                "⚠️ Your stored session could not be read. Please /login again.",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_store::MemorySessionStore;

    #[tokio::test]
    async fn missing_session_prompts_login() {
        let store = MemorySessionStore::new();
        let err = resolve_token(&store, 1).await.unwrap_err();
        assert!(err.text.contains("/login"));
        assert!(err.keyboard.is_some());
    }

    #[tokio::test]
    async fn extracts_token_from_full_auth_payload() {
        let store = MemorySessionStore::new();
        store
            .set(1, r#"{"accessToken":"tok-1","user":{"email":"a@b.com"}}"#)
            .await
            .unwrap();
        assert_eq!(resolve_token(&store, 1).await.unwrap(), "tok-1");
    }

    #[tokio::test]
    async fn corrupt_payload_asks_for_relogin() {
        let store = MemorySessionStore::new();
        store.set(1, "not json").await.unwrap();
        let err = resolve_token(&store, 1).await.unwrap_err();
        assert!(err.text.contains("/login"));
        // The record stays for inspection; login overwrites it.
        assert!(store.get(1).await.unwrap().is_some());
    }
}
