//! Ollama API client for chat completion
//!
//! HTTP client for the Ollama chat endpoint, used for the open-ended
//! analytics Q&A side of a conversation.
//!
//! # Example
//!
//! ```ignore
//! use data_onboarding_sdk::llm::{ChatMessage, OllamaChatClient};
//!
//! let client = OllamaChatClient::new("http://localhost:11434", "llama3:8b")
//!     .with_timeout(60);
//!
//! let reply = client.chat(&[ChatMessage::user("total transactions?")]).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::{ChatClient, ChatMessage};
use super::error::{CompletionError, CompletionResult};

/// Ollama chat API client.
#[derive(Debug, Clone)]
pub struct OllamaChatClient {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model name to use
    model: String,
    /// Request timeout in seconds
    timeout_seconds: u64,
    /// Temperature for sampling
    temperature: f32,
    /// HTTP client
    client: reqwest::Client,
}

/// Request body for the Ollama chat endpoint
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ChatOptions,
}

/// Options for generation
#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Response from the Ollama chat endpoint
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl OllamaChatClient {
    /// Create a new Ollama chat client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the Ollama API (e.g., "http://localhost:11434")
    /// * `model` - Model name to use (e.g., "llama3:8b")
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout_seconds: 120,
            temperature: 0.0,
            client: reqwest::Client::new(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the temperature for sampling
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatClient for OllamaChatClient {
    async fn chat(&self, conversation: &[ChatMessage]) -> CompletionResult<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: conversation,
            stream: false,
            options: ChatOptions { temperature: self.temperature },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(std::time::Duration::from_secs(self.timeout_seconds))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout(self.timeout_seconds)
                } else {
                    CompletionError::Connection(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(CompletionError::InvalidResponse(format!(
                "chat request failed: HTTP {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;
        Ok(parsed.message.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_and_overrides() {
        let client = OllamaChatClient::new("http://localhost:11434", "llama3:8b");
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.model_name(), "llama3:8b");
        assert_eq!(client.timeout_seconds, 120);

        let client = client.with_timeout(30).with_temperature(5.0);
        assert_eq!(client.timeout_seconds, 30);
        // Temperature is clamped to the valid sampling range.
        assert_eq!(client.temperature, 2.0);
    }

    #[test]
    fn test_chat_request_shape() {
        let messages = [ChatMessage::user("hello")];
        let request = ChatRequest {
            model: "llama3:8b",
            messages: &messages,
            stream: false,
            options: ChatOptions { temperature: 0.0 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3:8b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
