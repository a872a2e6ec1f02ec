use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transcription service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptionConfig {
    /// Base URL of a Whisper-compatible API (OpenAI or self-hosted)
    pub api_url: String,
    /// Bearer token; self-hosted Whisper servers usually run without one
    pub api_key: Option<String>,
    pub model: String,
    /// ISO-639-1 language code sent with every request
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "whisper-1".to_string(),
            language: "en".to_string(),
            timeout_secs: 120,
        }
    }
}

impl TranscriptionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = std::env::var("TRANSCRIPTION_API_URL").unwrap_or(defaults.api_url);
        let api_key = std::env::var("TRANSCRIPTION_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model = std::env::var("TRANSCRIPTION_MODEL").unwrap_or(defaults.model);
        let language = std::env::var("TRANSCRIPTION_LANGUAGE").unwrap_or(defaults.language);
        let timeout_secs = std::env::var("TRANSCRIPTION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            api_url,
            api_key,
            model,
            language,
            timeout_secs,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
