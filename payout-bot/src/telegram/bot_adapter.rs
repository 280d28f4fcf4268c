//! Wraps teloxide::Bot and implements [`crate::core::ChatBot`]. Production
//! code talks to Telegram; tests can substitute another ChatBot impl.

use crate::core::{parse_message_id, BotError, Button, ChatBot, Keyboard, Reply, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use tracing::warn;

/// Thin wrapper around teloxide::Bot that implements the ChatBot trait.
pub struct TelegramChatBot {
    bot: teloxide::Bot,
}

impl TelegramChatBot {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
        .iter()
        .map(|row| {
            row.iter()
                .filter_map(|button| match button {
                    Button::Callback { label, data } => {
                        Some(InlineKeyboardButton::callback(label.clone(), data.clone()))
                    }
                    Button::Url { label, url } => match url::Url::parse(url) {
                        Ok(parsed) => Some(InlineKeyboardButton::url(label.clone(), parsed)),
                        Err(e) => {
                            // The reply text carries the link as a fallback.
                            warn!(url = %url, error = %e, "Dropping unparseable URL button");
                            None
                        }
                    },
                })
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

#[async_trait]
impl ChatBot for TelegramChatBot {
    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<String> {
        let mut request = self.bot.send_message(ChatId(chat_id), reply.text.clone());
        if reply.markdown {
            request = request.parse_mode(ParseMode::Markdown);
        }
        if let Some(keyboard) = &reply.keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }
        let sent = request
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;
        Ok(sent.id.to_string())
    }

    async fn edit(&self, chat_id: i64, message_id: &str, reply: &Reply) -> Result<()> {
        let id = parse_message_id(message_id)?;
        let mut request =
            self.bot
                .edit_message_text(ChatId(chat_id), MessageId(id), reply.text.clone());
        if reply.markdown {
            request = request.parse_mode(ParseMode::Markdown);
        }
        if let Some(keyboard) = &reply.keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }
        request
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        let mut request = self.bot.answer_callback_query(teloxide::types::CallbackQueryId(callback_id.to_string()));
        if let Some(text) = text {
            request = request.text(text.to_string());
        }
        request
            .await
            .map_err(|e| BotError::Transport(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_conversion_keeps_rows_and_drops_bad_urls() {
        let keyboard: Keyboard = vec![
            vec![
                Button::callback("A", "a"),
                Button::callback("B", "b"),
            ],
            vec![
                Button::url("Portal", "https://example.com"),
                Button::url("Broken", "not a url"),
            ],
        ];
        let markup = to_markup(&keyboard);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        // The malformed URL button is dropped, the valid one survives.
        assert_eq!(markup.inline_keyboard[1].len(), 1);
    }
}
