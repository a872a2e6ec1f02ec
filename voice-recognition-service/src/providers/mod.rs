pub mod whisper;

pub use whisper::WhisperProvider;

use crate::error::TranscriptionResult;
use crate::transcription::{AudioPayload, RecognizedSpeech, TranscriptionRequest};
use async_trait::async_trait;

/// Speech-to-text backend
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Decode one recording into text
    async fn transcribe(
        &self,
        audio: &AudioPayload,
        request: &TranscriptionRequest,
    ) -> TranscriptionResult<RecognizedSpeech>;
}
