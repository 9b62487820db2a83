//! # LLM client
//!
//! [`LlmClient`] is the seam the conversation handler talks to; [`OpenAILlmClient`] wraps
//! async-openai chat completions and prepends the system prompt.

use anyhow::Result;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::LlmConfig;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are OMNICore, the assistant of the OMNI Empire platform. \
Answer briefly in plain text without Markdown so the reply reads well in Telegram.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn of a conversation. Also the shape stored in user state history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply for the given conversation.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;
}

/// Masks an API key for logging: first 7 chars + "***" + last 4. Keys of 11 chars or
/// fewer become "***".
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

#[derive(Clone)]
pub struct OpenAILlmClient {
    client: Client<OpenAIConfig>,
    model: String,
    system_prompt: Option<String>,
    masked_key: String,
}

impl OpenAILlmClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let masked_key = mask_token(&api_key);
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base_url) = base_url {
            config = config.with_api_base(base_url);
        }
        Self {
            client: Client::with_config(config),
            model: "gpt-3.5-turbo".to_string(),
            system_prompt: None,
            masked_key,
        }
    }

    /// Builds a client from config; `None` when no API key is set.
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(
            Self::new(api_key, config.base_url.clone())
                .with_model(config.model.clone())
                .with_system_prompt_opt(config.system_prompt.clone()),
        )
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_system_prompt_opt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    fn to_openai(msg: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
        let content = msg.content.clone();
        Ok(match msg.role {
            ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()?
                .into(),
            ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()?
                .into(),
            ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()?
                .into(),
        })
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages), fields(model = %self.model))]
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let system = self
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        let mut request_messages = vec![Self::to_openai(&ChatMessage {
            role: ChatRole::System,
            content: system.to_string(),
        })?];
        for msg in &messages {
            request_messages.push(Self::to_openai(msg)?);
        }

        info!(
            message_count = request_messages.len(),
            api_key = %self.masked_key,
            "OpenAI chat_completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .build()?;
        let response = self.client.chat().create(request).await?;

        if let Some(ref usage) = response.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "OpenAI chat_completion usage"
            );
        }

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("No response from OpenAI"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("sk-1234567890abcdef"), "sk-1234***cdef");
        assert_eq!(mask_token("short"), "***");
        assert_eq!(mask_token("12345678901"), "***");
    }

    #[test]
    fn test_chat_message_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = LlmConfig {
            api_key: None,
            base_url: None,
            model: "gpt-3.5-turbo".to_string(),
            system_prompt: None,
        };
        assert!(OpenAILlmClient::from_config(&config).is_none());
    }
}
