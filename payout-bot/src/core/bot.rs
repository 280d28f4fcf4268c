//! Chat transport abstraction for sending and editing messages and
//! acknowledging button presses. The teloxide implementation lives in
//! `telegram::bot_adapter`.

use crate::core::error::{BotError, Result};
use crate::core::types::Reply;
use async_trait::async_trait;

/// Abstraction over the chat transport. Implementations map to a concrete
/// transport (e.g. Telegram).
#[async_trait]
pub trait ChatBot: Send + Sync {
    /// Sends a message to the given chat; returns the transport message id
    /// (for later edits).
    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<String>;
    /// Edits an already-sent message. `message_id` is transport-specific
    /// (Telegram numeric string).
    async fn edit(&self, chat_id: i64, message_id: &str, reply: &Reply) -> Result<()>;
    /// Acknowledges a button press, optionally with a toast text.
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}

/// Parses a message id string into an i32. Used by edit.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| BotError::Transport(format!("Invalid message_id for edit: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_id_valid() {
        assert_eq!(parse_message_id("123").unwrap(), 123);
        assert_eq!(parse_message_id("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_message_id_invalid() {
        assert!(parse_message_id("").is_err());
        assert!(parse_message_id("abc").is_err());
        assert!(parse_message_id("12.3").is_err());
    }
}
