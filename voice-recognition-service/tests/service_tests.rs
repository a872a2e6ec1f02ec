use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use voice_recognition_service::{
    AudioPayload, RecognizedSpeech, TranscriptionConfig, TranscriptionError, TranscriptionProvider,
    TranscriptionRequest, TranscriptionResult, TranscriptionService,
};

#[derive(Default)]
struct RecordingProvider {
    seen: Mutex<Vec<TranscriptionRequest>>,
    duration: Option<f64>,
    fail: bool,
}

#[async_trait]
impl TranscriptionProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn transcribe(
        &self,
        _audio: &AudioPayload,
        request: &TranscriptionRequest,
    ) -> TranscriptionResult<RecognizedSpeech> {
        self.seen.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(TranscriptionError::Upstream {
                status: 503,
                message: "unavailable".into(),
            });
        }
        Ok(RecognizedSpeech {
            text: "Patient states pain is controlled with morphine.".into(),
            duration_seconds: self.duration,
        })
    }
}

fn wav_of(seconds: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..seconds * 8000 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[tokio::test]
async fn test_vocabulary_hint_and_language_reach_the_provider() {
    let provider = Arc::new(RecordingProvider {
        duration: Some(31.0),
        ..Default::default()
    });
    let config = TranscriptionConfig {
        language: "es".into(),
        ..TranscriptionConfig::default()
    };
    let service = TranscriptionService::with_provider(config, provider.clone());

    let transcript = service.transcribe(&AudioPayload::wav(vec![7; 16])).await.unwrap();

    assert_eq!(transcript.text, "Patient states pain is controlled with morphine.");
    assert_eq!(transcript.duration_seconds, Some(31.0));

    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].language, "es");
    assert!(seen[0].vocabulary_hint.contains("hydromorphone"));
    assert!(seen[0].vocabulary_hint.contains("Palliative Performance Scale"));
}

#[tokio::test]
async fn test_wav_header_supplies_missing_duration() {
    let provider = Arc::new(RecordingProvider::default());
    let service = TranscriptionService::with_provider(TranscriptionConfig::default(), provider);

    let transcript = service.transcribe(&AudioPayload::wav(wav_of(3))).await.unwrap();
    assert_eq!(transcript.duration_seconds, Some(3.0));
}

#[tokio::test]
async fn test_empty_audio_is_rejected_before_the_provider() {
    let provider = Arc::new(RecordingProvider::default());
    let service = TranscriptionService::with_provider(TranscriptionConfig::default(), provider.clone());

    let err = service.transcribe(&AudioPayload::wav(Vec::new())).await.unwrap_err();
    assert!(matches!(err, TranscriptionError::InvalidAudio(_)));
    assert!(provider.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_provider_failure_propagates_without_retry() {
    let provider = Arc::new(RecordingProvider {
        fail: true,
        ..Default::default()
    });
    let service = TranscriptionService::with_provider(TranscriptionConfig::default(), provider.clone());

    let err = service.transcribe(&AudioPayload::wav(vec![1])).await.unwrap_err();
    assert!(matches!(err, TranscriptionError::Upstream { status: 503, .. }));
    assert_eq!(provider.seen.lock().unwrap().len(), 1);
}
