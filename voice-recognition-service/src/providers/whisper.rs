/// Whisper-compatible transcription over HTTP
///
/// Works against the hosted OpenAI endpoint and against self-hosted Whisper
/// servers that expose the same `/audio/transcriptions` route.
use crate::config::TranscriptionConfig;
use crate::error::{TranscriptionError, TranscriptionResult};
use crate::providers::TranscriptionProvider;
use crate::transcription::{AudioPayload, RecognizedSpeech, TranscriptionRequest};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    text: String,
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub struct WhisperProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl WhisperProvider {
    pub fn new(config: &TranscriptionConfig) -> TranscriptionResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TranscriptionError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/audio/transcriptions", config.api_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn form(&self, audio: &AudioPayload, request: &TranscriptionRequest) -> TranscriptionResult<Form> {
        let file = Part::bytes(audio.bytes.clone())
            .file_name(audio.file_name.clone())
            .mime_str(&audio.mime_type)
            .map_err(|e| TranscriptionError::InvalidAudio(format!("bad MIME type: {e}")))?;

        Ok(Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("language", request.language.clone())
            .text("prompt", request.vocabulary_hint.clone())
            .text("response_format", "verbose_json"))
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperProvider {
    fn name(&self) -> &str {
        "whisper"
    }

    async fn transcribe(
        &self,
        audio: &AudioPayload,
        request: &TranscriptionRequest,
    ) -> TranscriptionResult<RecognizedSpeech> {
        debug!(bytes = audio.bytes.len(), mime = %audio.mime_type, "Sending audio to Whisper");

        let mut builder = self.client.post(&self.endpoint).multipart(self.form(audio, request)?);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(TranscriptionError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: VerboseTranscription = serde_json::from_str(&body)
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;

        Ok(RecognizedSpeech {
            text: parsed.text.trim().to_string(),
            duration_seconds: parsed.duration,
        })
    }
}
