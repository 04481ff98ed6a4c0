//! Ephemeral bookkeeping chat.

pub mod history;
pub mod responder;
pub mod service;

pub use history::{ChatRole, ChatTurn, ConversationHistory};
pub use service::{ChatOutcome, ChatReply, ChatRequest, ChatService};
