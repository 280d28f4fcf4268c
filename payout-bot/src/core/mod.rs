//! Transport-agnostic core: event and reply types, error taxonomy, the
//! [`ChatBot`] trait, and tracing setup.

mod bot;
mod error;
mod logger;
pub mod types;

pub use bot::{parse_message_id, ChatBot};
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use types::{
    parse_command, Action, Button, Command, EngineOutput, Event, Keyboard, Reply,
};
