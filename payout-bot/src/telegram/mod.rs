//! Telegram transport: the teloxide adapter and the update dispatcher.

mod bot_adapter;
mod runner;

pub use bot_adapter::TelegramChatBot;
pub use runner::run_bot;
