//! Dispatcher wiring: converts Telegram updates to engine events, runs the
//! engine, and delivers its output back through the [`ChatBot`] adapter.

use crate::config::BotConfig;
use crate::core::{init_tracing, Action, ChatBot, Command, EngineOutput, Event, Reply};
use crate::engine::ConversationEngine;
use crate::telegram::TelegramChatBot;
use anyhow::Result;
use payout_api::CopperxClient;
use session_store::RedisSessionStore;
use std::sync::Arc;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::MaybeInaccessibleMessage;
use tracing::{error, info, instrument, warn};

/// Delivers engine output to a chat. `edit_target` is the message the
/// triggering button was attached to, when there is one; a failed edit
/// tells the user the button expired and falls back to a fresh message
/// so stale buttons still get a response.
async fn deliver(
    bot: &dyn ChatBot,
    chat_id: i64,
    edit_target: Option<&str>,
    output: &EngineOutput,
) {
    for reply in &output.replies {
        let result = match (reply.edit, edit_target) {
            (true, Some(message_id)) => match bot.edit(chat_id, message_id, reply).await {
                Ok(()) => Ok(String::new()),
                Err(e) => {
                    warn!(chat_id, error = %e, "Edit failed, sending instead");
                    let notice = Reply::text(
                        "⚠️ This button has expired. Sending a fresh message instead:",
                    );
                    if let Err(e) = bot.send(chat_id, &notice).await {
                        error!(chat_id, error = %e, "Failed to deliver expiry notice");
                    }
                    bot.send(chat_id, reply).await
                }
            },
            _ => bot.send(chat_id, reply).await,
        };
        if let Err(e) = result {
            error!(chat_id, error = %e, "Failed to deliver reply");
        }
    }
}

async fn handle_message(
    engine: &ConversationEngine,
    bot: &TelegramChatBot,
    msg: &Message,
) {
    let Some(user) = &msg.from else {
        return;
    };
    let Some(text) = msg.text() else {
        return;
    };
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id.0;
    info!(user_id, chat_id, "step: received message");

    let event = match Command::parse(text) {
        Some(command) => Event::Command(command),
        None => Event::Text(text.to_string()),
    };
    let output = engine.handle(user_id, event).await;
    deliver(bot, chat_id, None, &output).await;
}

async fn handle_callback(
    engine: &ConversationEngine,
    bot: &TelegramChatBot,
    query: &CallbackQuery,
) {
    let user_id = query.from.id.0 as i64;
    let target = query
        .message
        .as_ref()
        .map(|m: &MaybeInaccessibleMessage| (m.chat().id.0, m.id().to_string()));

    let output = match query.data.as_deref().and_then(Action::parse) {
        Some(action) => engine.handle(user_id, Event::Action(action)).await,
        None => {
            warn!(user_id, data = ?query.data, "step: unrecognized callback data");
            EngineOutput::none()
        }
    };

    // Always answer so the button stops spinning; the ack doubles as the
    // toast for state-expired and no-op cases.
    let callback_id = query.id.to_string();
    if let Err(e) = bot
        .answer_callback(&callback_id, output.ack.as_deref())
        .await
    {
        warn!(user_id, error = %e, "Failed to answer callback query");
    }

    if let Some((chat_id, message_id)) = target {
        deliver(bot, chat_id, Some(&message_id), &output).await;
    } else if !output.replies.is_empty() {
        // Message too old for Telegram to reference; fall back to the
        // user's own chat.
        deliver(bot, user_id, None, &output).await;
    }
}

fn build_teloxide_bot(config: &BotConfig) -> Bot {
    let bot = Bot::new(config.bot_token.clone());
    if let Some(ref url_str) = config.telegram_api_url {
        match url::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        }
    } else {
        bot
    }
}

/// Main entry: init logging, connect the session store and API client,
/// then dispatch Telegram updates until shutdown.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    init_tracing(&config.log_file)?;
    info!("Starting payout bot");

    let sessions = RedisSessionStore::connect(&config.redis_url).await?;
    let api = CopperxClient::with_timeout(&config.api_base_url, config.api_timeout)?;
    let engine = Arc::new(ConversationEngine::new(
        Arc::new(api),
        Arc::new(sessions),
    ));

    let teloxide_bot = build_teloxide_bot(&config);
    let adapter = Arc::new(TelegramChatBot::new(teloxide_bot.clone()));

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(
            |msg: Message,
             engine: Arc<ConversationEngine>,
             adapter: Arc<TelegramChatBot>| async move {
                handle_message(&engine, &adapter, &msg).await;
                respond(())
            },
        ))
        .branch(Update::filter_callback_query().endpoint(
            |query: CallbackQuery,
             engine: Arc<ConversationEngine>,
             adapter: Arc<TelegramChatBot>| async move {
                handle_callback(&engine, &adapter, &query).await;
                respond(())
            },
        ));

    Dispatcher::builder(teloxide_bot, handler)
        .dependencies(dptree::deps![engine, adapter])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Payout bot stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BotError, Result as BotResult};
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// ChatBot that records deliveries; `fail_edit` simulates Telegram
    /// refusing to edit a message that is too old.
    #[derive(Default)]
    struct RecordingBot {
        fail_edit: bool,
        sent: Mutex<Vec<String>>,
        edited: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatBot for RecordingBot {
        async fn send(&self, _chat_id: i64, reply: &Reply) -> BotResult<String> {
            self.sent.lock().await.push(reply.text.clone());
            Ok("100".to_string())
        }

        async fn edit(&self, _chat_id: i64, _message_id: &str, reply: &Reply) -> BotResult<()> {
            if self.fail_edit {
                return Err(BotError::Transport(
                    "message to edit not found".to_string(),
                ));
            }
            self.edited.lock().await.push(reply.text.clone());
            Ok(())
        }

        async fn answer_callback(&self, _callback_id: &str, _text: Option<&str>) -> BotResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_edit_notifies_expiry_and_sends_fresh_message() {
        let bot = RecordingBot {
            fail_edit: true,
            ..Default::default()
        };
        let output = EngineOutput::reply(Reply::text("done").as_edit());

        deliver(&bot, 1, Some("5"), &output).await;

        let sent = bot.sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("expired"));
        assert_eq!(sent[1], "done");
    }

    #[tokio::test]
    async fn successful_edit_sends_no_extra_messages() {
        let bot = RecordingBot::default();
        let output = EngineOutput::reply(Reply::text("done").as_edit());

        deliver(&bot, 1, Some("5"), &output).await;

        assert!(bot.sent.lock().await.is_empty());
        assert_eq!(bot.edited.lock().await.as_slice(), ["done".to_string()]);
    }

    #[tokio::test]
    async fn edit_reply_without_target_is_sent_plainly() {
        let bot = RecordingBot::default();
        let output = EngineOutput::reply(Reply::text("done").as_edit());

        deliver(&bot, 1, None, &output).await;

        assert_eq!(bot.sent.lock().await.as_slice(), ["done".to_string()]);
        assert!(bot.edited.lock().await.is_empty());
    }
}
