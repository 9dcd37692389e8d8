//! LLM completion collaborator
//!
//! Used for open-ended analytics Q&A only. Slot extraction is deterministic
//! and never goes through this module, so a completion failure can at worst
//! degrade the chat experience - it cannot affect configuration correctness.

pub mod client;
pub mod error;
#[cfg(feature = "api-backend")]
pub mod ollama;

pub use client::{ChatClient, ChatMessage, Role};
pub use error::{CompletionError, CompletionResult};
#[cfg(feature = "api-backend")]
pub use ollama::OllamaChatClient;

use once_cell::sync::Lazy;
use regex::Regex;

static JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]+?\}").expect("hard-coded regex compiles"));

/// Extract the first JSON object found in a chat reply. Returns `"{}"` when
/// the reply contains none, so callers can always feed the result to a
/// parser and handle the empty-object case uniformly.
pub fn extract_json_block(text: &str) -> &str {
    JSON_BLOCK.find(text).map(|m| m.as_str()).unwrap_or("{}")
}
