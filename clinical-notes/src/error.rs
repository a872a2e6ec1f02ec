use error_common::{Categorized, ErrorCategory};
use thiserror::Error;

/// Failure of one call to the generative completion service
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Completion service is not configured: {0}")]
    NotConfigured(String),

    #[error("Completion service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Completion request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected completion response: {0}")]
    InvalidResponse(String),
}

impl Categorized for CompletionError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::NotConfigured(_) | Self::Upstream { .. } | Self::Network(_) => {
                ErrorCategory::UpstreamService
            }
            Self::InvalidResponse(_) => ErrorCategory::MalformedResponse,
        }
    }
}

/// Why a generated answer was discarded in favour of the fallback
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("completion text contains no JSON object")]
    NoJsonObject,

    #[error("completion JSON does not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("generated note is incomplete: {0}")]
    Incomplete(String),
}

impl Categorized for SynthesisError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Completion(inner) => inner.category(),
            Self::NoJsonObject | Self::Decode(_) | Self::Incomplete(_) => ErrorCategory::MalformedResponse,
        }
    }
}
