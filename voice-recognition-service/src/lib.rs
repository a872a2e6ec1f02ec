//! Visit audio transcription for hospice documentation
//!
//! Nurses record the visit on a device; this crate sends the recording to a
//! Whisper-compatible speech service and returns a [`Transcript`]. Every
//! request carries a palliative-care vocabulary prompt so that drug names,
//! symptom terms and scale names come back spelled correctly.
//!
//! Failures surface as [`TranscriptionError`]; no retry happens here.
//!
//! # Example
//!
//! ```rust,no_run
//! use voice_recognition_service::{AudioPayload, TranscriptionConfig, TranscriptionService};
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), voice_recognition_service::TranscriptionError> {
//! let service = TranscriptionService::new(TranscriptionConfig::from_env())?;
//! let transcript = service.transcribe(&AudioPayload::wav(bytes)).await?;
//! println!("{}", transcript.text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod medical_vocabulary;
pub mod providers;
pub mod service;
pub mod transcription;

pub use config::*;
pub use error::*;
pub use medical_vocabulary::*;
pub use providers::*;
pub use service::*;
pub use transcription::*;
