use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Recognized text of one visit recording. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
            duration_seconds: None,
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }
}

/// Binary audio as recorded on the device
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn wav(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "visit.wav", "audio/wav")
    }

    /// Build from a file name, inferring the MIME type from its extension
    pub fn from_file_name(bytes: Vec<u8>, file_name: &str) -> Option<Self> {
        let ext = file_name.rsplit_once('.').map(|(_, ext)| ext)?;
        let mime = mime_type_for_extension(ext)?;
        Some(Self::new(bytes, file_name, mime))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Duration read from the WAV header; `None` for other containers
    pub fn wav_duration_seconds(&self) -> Option<f64> {
        let reader = hound::WavReader::new(Cursor::new(self.bytes.as_slice())).ok()?;
        let rate = reader.spec().sample_rate;
        if rate == 0 {
            return None;
        }
        Some(f64::from(reader.duration()) / f64::from(rate))
    }
}

/// Map a file extension to the MIME type sent to the transcription service.
///
/// Returns `None` for extensions that aren't supported audio formats.
pub fn mime_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "wav" => Some("audio/wav"),
        "mp3" => Some("audio/mpeg"),
        "m4a" | "mp4" => Some("audio/mp4"),
        "webm" => Some("audio/webm"),
        "ogg" => Some("audio/ogg"),
        "flac" => Some("audio/flac"),
        _ => None,
    }
}

/// What a provider is asked to do besides decoding audio
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub language: String,
    /// Free-text prompt biasing word recognition toward domain terms
    pub vocabulary_hint: String,
}

/// Raw provider answer before it becomes a [`Transcript`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedSpeech {
    pub text: String,
    pub duration_seconds: Option<f64>,
}
