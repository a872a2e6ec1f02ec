use crate::config::TranscriptionConfig;
use crate::error::{TranscriptionError, TranscriptionResult};
use crate::medical_vocabulary::PalliativeVocabulary;
use crate::providers::{TranscriptionProvider, WhisperProvider};
use crate::transcription::{AudioPayload, Transcript, TranscriptionRequest};
use logger_redacted::redact_preview;
use std::sync::Arc;
use tracing::{info, instrument};

/// Turns visit recordings into transcripts
pub struct TranscriptionService {
    config: TranscriptionConfig,
    provider: Arc<dyn TranscriptionProvider>,
}

impl TranscriptionService {
    /// Create a service backed by the Whisper-compatible HTTP provider
    pub fn new(config: TranscriptionConfig) -> TranscriptionResult<Self> {
        let provider = Arc::new(WhisperProvider::new(&config)?);
        Ok(Self { config, provider })
    }

    /// Create a service with an explicit provider
    pub fn with_provider(config: TranscriptionConfig, provider: Arc<dyn TranscriptionProvider>) -> Self {
        Self { config, provider }
    }

    /// Transcribe one recording. The palliative vocabulary is always sent as a hint.
    #[instrument(skip(self, audio), fields(provider = self.provider.name(), bytes = audio.bytes.len()))]
    pub async fn transcribe(&self, audio: &AudioPayload) -> TranscriptionResult<Transcript> {
        if audio.is_empty() {
            return Err(TranscriptionError::InvalidAudio("audio payload is empty".into()));
        }

        let request = TranscriptionRequest {
            language: self.config.language.clone(),
            vocabulary_hint: PalliativeVocabulary::prompt_hint(),
        };

        let speech = self.provider.transcribe(audio, &request).await?;

        let mut transcript = Transcript::new(speech.text);
        if let Some(seconds) = speech.duration_seconds.or_else(|| audio.wav_duration_seconds()) {
            transcript = transcript.with_duration(seconds);
        }

        info!(
            chars = transcript.text.len(),
            duration = ?transcript.duration_seconds,
            preview = %redact_preview(&transcript.text, 60),
            "Transcription complete"
        );

        Ok(transcript)
    }
}
