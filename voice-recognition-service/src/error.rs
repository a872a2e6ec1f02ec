use error_common::{Categorized, ErrorCategory};
use thiserror::Error;

/// Failure of the transcription step. No retry is attempted here; retry
/// policy belongs to the caller.
#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("Transcription configuration error: {0}")]
    Configuration(String),

    #[error("Audio payload rejected: {0}")]
    InvalidAudio(String),

    #[error("Transcription service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Transcription request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected transcription response: {0}")]
    InvalidResponse(String),
}

impl Categorized for TranscriptionError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::InvalidAudio(_) => ErrorCategory::InvalidInput,
            Self::Upstream { .. } | Self::Network(_) => ErrorCategory::UpstreamService,
            Self::InvalidResponse(_) => ErrorCategory::MalformedResponse,
        }
    }
}

pub type TranscriptionResult<T> = Result<T, TranscriptionError>;
