// Generative completion seam
pub mod openai;

pub use openai::{CompletionConfig, OpenAiCompletionClient};

use crate::error::CompletionError;
use async_trait::async_trait;

/// One role-tagged request with fixed sampling parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPrompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Text completion backend. Implementations make exactly one attempt per call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the raw completion text. `schema_hint` describes the JSON
    /// document the caller expects back.
    async fn complete(&self, prompt: &CompletionPrompt, schema_hint: &str) -> Result<String, CompletionError>;
}
