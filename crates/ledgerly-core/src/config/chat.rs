//! Chat settings.

use serde::{Deserialize, Serialize};

/// Settings for the ephemeral chat layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum accepted message length in characters.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
    /// Number of prior exchanges kept per in-memory conversation.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Trial queries allowed per anonymous client before sign-up.
    #[serde(default = "default_trial_query_limit")]
    pub trial_query_limit: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
            history_window: default_history_window(),
            trial_query_limit: default_trial_query_limit(),
        }
    }
}

fn default_max_message_chars() -> usize {
    2000
}

fn default_history_window() -> usize {
    10
}

fn default_trial_query_limit() -> u32 {
    5
}
