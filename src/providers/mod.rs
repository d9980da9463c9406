mod chat_completions;
mod prompt;

pub use chat_completions::ChatCompletionsProvider;
pub use prompt::{
    build_recipe_request, build_scan_request, image_data_uri, RECIPE_PROMPT_TEMPLATE, SCAN_PROMPT,
};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::RecipeError;

/// Unified trait for completion endpoints
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name (e.g., "groq")
    fn provider_name(&self) -> &str;

    /// Send one request and return the model's raw text reply
    async fn complete(&self, request: &CompletionRequest) -> Result<String, RecipeError>;
}

/// Everything about a request except the model, which the provider owns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn user(content: MessageContent) -> Self {
        ChatMessage {
            role: "user",
            content,
        }
    }
}

/// Plain text, or ordered parts for image-bearing messages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    ImageUrl { image_url: ImageUrl },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}
