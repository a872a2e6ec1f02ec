/// OpenAI-compatible `/chat/completions` client
use crate::completion::{CompletionClient, CompletionPrompt};
use crate::error::CompletionError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const MODEL_ENV: &str = "COMPLETION_MODEL";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompletionConfig {
    pub base_url: String,
    /// Without a key every call fails and callers take their fallback path
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

impl CompletionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var(BASE_URL_ENV).unwrap_or(defaults.base_url),
            api_key: std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty()),
            model: std::env::var(MODEL_ENV).unwrap_or(defaults.model),
            timeout_secs: defaults.timeout_secs,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiCompletionClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, prompt: &CompletionPrompt, schema_hint: &str) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CompletionError::NotConfigured(format!("{API_KEY_ENV} is not set")))?;

        let system = format!(
            "{}\n\nRespond with a single JSON object and nothing else. Shape:\n{schema_hint}",
            prompt.system
        );
        let payload = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: &system },
                ChatMessage { role: "user", content: &prompt.user },
            ],
            temperature: prompt.temperature,
            max_tokens: prompt.max_tokens,
            response_format: ResponseFormat { kind: "json_object" },
        };

        debug!(model = %self.model, temperature = prompt.temperature, "Requesting completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&error_text)
                .ok()
                .and_then(|v| v.pointer("/error/message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or(error_text);
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(format!("response parse error: {e}")))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::InvalidResponse("no completion choices".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn prompt() -> CompletionPrompt {
        CompletionPrompt {
            system: "Structure the note.".into(),
            user: "Patient resting.".into(),
            temperature: 0.3,
            max_tokens: 2000,
        }
    }

    fn client_for(server: &mockito::ServerGuard, key: Option<&str>) -> OpenAiCompletionClient {
        OpenAiCompletionClient::new(&CompletionConfig {
            base_url: server.url(),
            api_key: key.map(str::to_string),
            ..CompletionConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_request_shape_and_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({
                    "model": "gpt-4o-mini",
                    "max_tokens": 2000,
                    "response_format": {"type": "json_object"}
                })),
                Matcher::Regex(r#""role":"user","content":"Patient resting\.""#.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"{\"ok\":true}"}}]}"#)
            .create_async()
            .await;

        let text = client_for(&server, Some("sk-test"))
            .complete(&prompt(), "{\"ok\": boolean}")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(text, "{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_a_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/chat/completions").expect(0).create_async().await;

        let err = client_for(&server, None).complete(&prompt(), "{}").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, CompletionError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_upstream_error_message_is_kept() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body(r#"{"error":{"message":"The server had an error"}}"#)
            .create_async()
            .await;

        let err = client_for(&server, Some("k")).complete(&prompt(), "{}").await.unwrap_err();
        assert_eq!(err.to_string(), "Completion service returned 500: The server had an error");
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = client_for(&server, Some("k")).complete(&prompt(), "{}").await.unwrap_err();
        assert!(matches!(err, CompletionError::InvalidResponse(_)));
    }
}
