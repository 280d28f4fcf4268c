//! Telegram front end for the Copperx payout platform: OTP login, wallet
//! and balance views, single and batch transfers, withdrawals, transfer
//! history, and KYC status, driven by a transport-neutral conversation
//! engine.

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};
pub use config::BotConfig;
pub use core::{init_tracing, ChatBot};
pub use engine::{ConversationEngine, PayoutApi};
pub use telegram::{run_bot, TelegramChatBot};
