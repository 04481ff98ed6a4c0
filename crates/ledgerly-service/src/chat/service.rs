//! Chat orchestration: validation, gating, model selection, and reply
//! assembly.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ledgerly_core::AppResult;
use ledgerly_core::config::ChatConfig;
use ledgerly_core::error::AppError;
use ledgerly_database::store::{TrialStore, UsageLog};
use ledgerly_entity::Tier;

use crate::chat::history::ConversationHistory;
use crate::chat::responder;
use crate::context::RequestContext;
use crate::usage::UsageService;

/// An incoming chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Conversation to continue; omitted to start a new one.
    pub conversation_id: Option<String>,
    /// Requested model label; clamped to what the tier allows.
    pub model: Option<String>,
}

/// The result of a chat call.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChatOutcome {
    /// The message was answered.
    Reply(ChatReply),
    /// The usage gate refused the message.
    Denied {
        /// The stored limit.
        query_limit: i32,
        /// Always zero when denied.
        remaining: u32,
    },
}

/// An assembled assistant reply.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    /// The assistant's response text.
    pub reply: String,
    /// The model tier label the reply was produced under.
    pub model_used: String,
    /// Conversation this exchange belongs to.
    pub conversation_id: String,
    /// Queries consumed this cycle, including this one.
    pub query_count: u32,
    /// The stored limit.
    pub query_limit: i32,
    /// Queries remaining this cycle.
    pub remaining: u32,
}

/// Answers bookkeeping questions behind the usage gate.
#[derive(Clone)]
pub struct ChatService {
    usage: UsageService,
    usage_log: Arc<dyn UsageLog>,
    trial: Arc<dyn TrialStore>,
    history: Arc<ConversationHistory>,
    config: ChatConfig,
}

impl ChatService {
    /// Creates a new chat service.
    pub fn new(
        usage: UsageService,
        usage_log: Arc<dyn UsageLog>,
        trial: Arc<dyn TrialStore>,
        config: ChatConfig,
    ) -> Self {
        let history = Arc::new(ConversationHistory::new(config.history_window));
        Self {
            usage,
            usage_log,
            trial,
            history,
            config,
        }
    }

    fn validate_message<'a>(&self, message: &'a str) -> AppResult<&'a str> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::validation("Message must not be empty"));
        }
        if message.chars().count() > self.config.max_message_chars {
            return Err(AppError::validation(format!(
                "Message exceeds {} characters",
                self.config.max_message_chars
            )));
        }
        Ok(message)
    }

    fn assemble_reply(&self, message: &str, conversation_id: Option<String>) -> (String, String) {
        let reply = if responder::is_on_topic(message) {
            responder::reply_to(message)
        } else {
            responder::off_topic_reply()
        };
        let conversation_id =
            conversation_id.unwrap_or_else(ConversationHistory::new_conversation_id);
        self.history
            .append_exchange(&conversation_id, message.to_string(), reply.clone());
        (reply, conversation_id)
    }

    /// Handle one chat message from a signed-in caller.
    pub async fn chat(&self, ctx: &RequestContext, request: ChatRequest) -> AppResult<ChatOutcome> {
        let message = self.validate_message(&request.message)?;

        let outcome = self.usage.check_and_consume(ctx).await?;
        if !outcome.allowed {
            debug!(subject = %ctx.subject, "Chat refused by usage gate");
            return Ok(ChatOutcome::Denied {
                query_limit: outcome.query_limit,
                remaining: 0,
            });
        }

        let tier = outcome.entitlement.tier;
        let model = clamp_model(tier, request.model.as_deref());

        let (reply, conversation_id) = self.assemble_reply(message, request.conversation_id);

        if let Err(e) = self
            .usage_log
            .record_query(outcome.entitlement.id, Utc::now().date_naive(), &model)
            .await
        {
            warn!(subject = %ctx.subject, error = %e, "Usage analytics not recorded");
        }

        Ok(ChatOutcome::Reply(ChatReply {
            reply,
            model_used: model,
            conversation_id,
            query_count: outcome.query_count,
            query_limit: outcome.query_limit,
            remaining: outcome.remaining,
        }))
    }

    /// Handle one chat message from a caller without a session.
    ///
    /// Gated against the per-client trial allowance instead of an
    /// entitlement record, always runs the free-tier model, and is not
    /// counted in per-day analytics (there is no entitlement to key on).
    pub async fn chat_anonymous(
        &self,
        client_key: &str,
        request: ChatRequest,
    ) -> AppResult<ChatOutcome> {
        let message = self.validate_message(&request.message)?;

        let limit = self.config.trial_query_limit;
        let Some(row) = self.trial.try_consume(client_key, limit).await? else {
            debug!(client = %client_key, "Trial message refused: allowance exhausted");
            return Ok(ChatOutcome::Denied {
                query_limit: limit as i32,
                remaining: 0,
            });
        };

        let model = Tier::Free.model_label().to_string();
        let (reply, conversation_id) = self.assemble_reply(message, request.conversation_id);

        Ok(ChatOutcome::Reply(ChatReply {
            reply,
            model_used: model,
            conversation_id,
            query_count: row.count(),
            query_limit: row.query_limit,
            remaining: row.remaining(),
        }))
    }

    /// The retained turns for a conversation.
    pub fn conversation(&self, conversation_id: &str) -> Vec<crate::chat::history::ChatTurn> {
        self.history.turns(conversation_id)
    }
}

/// The model a request actually runs under.
///
/// A request may ask for any model, but never gets one above its tier;
/// an absent or over-privileged request falls back to the tier's model.
fn clamp_model(tier: Tier, requested: Option<&str>) -> String {
    let entitled = tier.model_label();
    match requested {
        None => entitled.to_string(),
        Some(requested) => {
            if model_rank(requested) <= model_rank(entitled) {
                requested.to_string()
            } else {
                entitled.to_string()
            }
        }
    }
}

fn model_rank(model: &str) -> u8 {
    match model {
        "premium-ai" => 2,
        "advanced-ai" => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_clamped_to_tier() {
        assert_eq!(clamp_model(Tier::Free, Some("premium-ai")), "standard-ai");
        assert_eq!(clamp_model(Tier::Basic, Some("premium-ai")), "advanced-ai");
        assert_eq!(clamp_model(Tier::Elite, Some("premium-ai")), "premium-ai");
    }

    #[test]
    fn test_model_defaults_to_tier() {
        assert_eq!(clamp_model(Tier::Free, None), "standard-ai");
        assert_eq!(clamp_model(Tier::Elite, None), "premium-ai");
    }

    #[test]
    fn test_downgrade_request_is_honored() {
        assert_eq!(clamp_model(Tier::Elite, Some("standard-ai")), "standard-ai");
    }
}
