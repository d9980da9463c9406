use crate::config::ClientConfig;
use crate::error::RecipeError;
use crate::providers::{ChatMessage, CompletionProvider, CompletionRequest};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// OpenAI-compatible `/v1/chat/completions` endpoint (Groq by default)
pub struct ChatCompletionsProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

impl ChatCompletionsProvider {
    /// Create a new provider from configuration
    pub fn new(config: &ClientConfig) -> Result<Self, RecipeError> {
        let api_key = config.resolve_api_key().ok_or(RecipeError::MissingApiKey)?;

        Ok(ChatCompletionsProvider {
            client: build_client(config.timeout())?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        ChatCompletionsProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

fn build_client(timeout: Duration) -> Result<Client, RecipeError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(RecipeError::from)
}

/// Map a raw HTTP outcome to the model's reply text.
///
/// An `error` member in the body wins over the status code; its `message`
/// is surfaced verbatim, otherwise the status is reported.
fn reply_text(status: u16, body: &str) -> Result<String, RecipeError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let success = (200..300).contains(&status);

    let api_error = parsed
        .as_ref()
        .and_then(|v| v.get("error"))
        .filter(|e| !e.is_null());
    if !success || api_error.is_some() {
        let message = api_error
            .and_then(|e| e["message"].as_str())
            .filter(|m| !m.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(RecipeError::upstream(message, Some(status)));
    }

    let parsed = parsed.ok_or_else(|| {
        RecipeError::upstream("Completion endpoint returned a non-JSON body", Some(status))
    })?;

    match parsed["choices"][0]["message"]["content"].as_str() {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(RecipeError::EmptyResponse),
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionsProvider {
    fn provider_name(&self) -> &str {
        "chat_completions"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, RecipeError> {
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            "Sending {} message(s) to {} (max_tokens={})",
            request.messages.len(),
            self.model,
            request.max_tokens
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let response_body = response.text().await?;
        debug!("Completion endpoint answered {} ({} bytes)", status, response_body.len());

        reply_text(status, &response_body)
    }
}
