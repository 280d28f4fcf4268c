//! Conversation engine: flow state, session guard, amount encoding,
//! rendering, and the event router tying them together.

pub mod amount;
pub mod api;
pub mod guard;
pub mod render;
pub mod state;

#[allow(clippy::module_inception)]
mod engine;

pub use api::PayoutApi;
pub use engine::ConversationEngine;
pub use state::{ConversationState, FlowStore};
