//! In-memory conversation history.
//!
//! Nothing here is persisted; history lives for the life of the process
//! and is scoped per conversation id. Each conversation keeps only a
//! bounded window of recent exchanges.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub at: DateTime<Utc>,
}

/// Per-conversation message buffers, keyed by conversation id.
#[derive(Debug)]
pub struct ConversationHistory {
    conversations: DashMap<String, Vec<ChatTurn>>,
    /// Number of exchanges (user + assistant pairs) retained.
    window: usize,
}

impl ConversationHistory {
    pub fn new(window: usize) -> Self {
        Self {
            conversations: DashMap::new(),
            window,
        }
    }

    /// Mint a fresh conversation id.
    pub fn new_conversation_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// The retained turns for a conversation, oldest first.
    pub fn turns(&self, conversation_id: &str) -> Vec<ChatTurn> {
        self.conversations
            .get(conversation_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Append one user/assistant exchange, evicting the oldest beyond
    /// the window.
    pub fn append_exchange(&self, conversation_id: &str, user: String, assistant: String) {
        let now = Utc::now();
        let mut entry = self
            .conversations
            .entry(conversation_id.to_string())
            .or_default();
        entry.push(ChatTurn {
            role: ChatRole::User,
            content: user,
            at: now,
        });
        entry.push(ChatTurn {
            role: ChatRole::Assistant,
            content: assistant,
            at: now,
        });

        let max_turns = self.window * 2;
        if entry.len() > max_turns {
            let excess = entry.len() - max_turns;
            entry.drain(..excess);
        }
    }

    /// Drop a conversation outright.
    pub fn forget(&self, conversation_id: &str) {
        self.conversations.remove(conversation_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_eviction() {
        let history = ConversationHistory::new(2);
        for i in 0..5 {
            history.append_exchange("c1", format!("q{i}"), format!("a{i}"));
        }
        let turns = history.turns("c1");
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].content, "q3");
        assert_eq!(turns[3].content, "a4");
    }

    #[test]
    fn test_conversations_are_isolated() {
        let history = ConversationHistory::new(10);
        history.append_exchange("a", "question".into(), "answer".into());
        assert!(history.turns("b").is_empty());
        history.forget("a");
        assert!(history.turns("a").is_empty());
    }
}
