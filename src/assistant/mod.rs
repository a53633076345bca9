//! Chat assistant and learning-path generation. An optional [`LanguageModel`] answers when
//! configured; every call degrades to deterministic local output when it is absent or fails.

mod fallback;
mod openai;
mod planner;

pub use fallback::{local_reply, suggested_responses};
pub use openai::OpenAiClient;
pub use planner::{default_path, generate_path, parse_items, title_case, PathRequest};

use crate::error::LlmError;
use crate::models::ChatContext;
use async_trait::async_trait;
use serde::Serialize;

pub const SYSTEM_PROMPT: &str = "You are a helpful learning assistant that helps users navigate their personalized learning path. \
You have access to the user's profile and learning recommendations. \
Be supportive, encouraging, and provide specific guidance based on the user's context. \
If the user asks about their learning path, refer to their recommendations. \
Keep responses concise and focused on learning and skill development.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        PromptMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        PromptMessage {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<PromptMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A chat-completion backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// The assistant's text for the last message in `request`.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// Messages for a chat turn: system prompt, the learner context when there is any, then the user message.
pub fn chat_prompt(message: &str, context: &ChatContext) -> Result<Vec<PromptMessage>, LlmError> {
    let mut messages = vec![PromptMessage::system(SYSTEM_PROMPT)];
    if !context.is_empty() {
        let json = serde_json::to_string_pretty(context).map_err(|e| LlmError::Parse(e.to_string()))?;
        messages.push(PromptMessage::system(format!(
            "Here is some context about the user and their learning path:\n{}",
            json
        )));
    }
    messages.push(PromptMessage::user(message));
    Ok(messages)
}

/// Answer a chat message. LLM failures are logged and answered locally.
pub async fn reply(llm: Option<&dyn LanguageModel>, message: &str, context: &ChatContext) -> String {
    let Some(llm) = llm else {
        return local_reply(message, context);
    };
    let request = match chat_prompt(message, context) {
        Ok(messages) => CompletionRequest {
            messages,
            temperature: 0.7,
            max_tokens: 500,
        },
        Err(error) => {
            tracing::warn!(%error, "could not build chat prompt");
            return local_reply(message, context);
        }
    };
    match llm.complete(request).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!("llm returned an empty reply; answering locally");
            local_reply(message, context)
        }
        Err(error) => {
            tracing::error!(%error, "llm call failed; answering locally");
            local_reply(message, context)
        }
    }
}
