//! Chat client trait and message types
//!
//! The trait gives the conversation layer a uniform seam over completion
//! backends, with a mock implementation for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::CompletionResult;
#[cfg(test)]
use super::error::CompletionError;

/// Role of one message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Trait for chat completion backends.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Generate the next assistant reply for an ordered conversation.
    async fn chat(&self, conversation: &[ChatMessage]) -> CompletionResult<String>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}

/// A mock chat client for testing
#[cfg(test)]
pub struct MockChatClient {
    response: String,
    model: String,
    should_fail: bool,
}

#[cfg(test)]
impl MockChatClient {
    /// Create a new mock client that returns the given response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            model: "mock-model".to_string(),
            should_fail: false,
        }
    }

    /// Create a mock client that fails
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            model: "mock-model".to_string(),
            should_fail: true,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl ChatClient for MockChatClient {
    async fn chat(&self, _conversation: &[ChatMessage]) -> CompletionResult<String> {
        if self.should_fail {
            Err(CompletionError::Connection("mock failure".to_string()))
        } else {
            Ok(self.response.clone())
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_success() {
        let client = MockChatClient::new("the total is 42");
        assert_eq!(client.model_name(), "mock-model");
        let reply = client.chat(&[ChatMessage::user("how many?")]).await.unwrap();
        assert_eq!(reply, "the total is 42");
    }

    #[tokio::test]
    async fn test_mock_client_failure() {
        let client = MockChatClient::failing();
        let result = client.chat(&[ChatMessage::user("hello")]).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let message = ChatMessage::user("hi");
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""role":"user""#));
    }
}
