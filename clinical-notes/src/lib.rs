//! Clinical note synthesis for hospice visits
//!
//! Takes a visit transcript and produces a structured SOAP note, a
//! completeness report and a list of extracted clinical entities.
//!
//! The generative backend sits behind [`CompletionClient`]. Neither
//! [`NoteSynthesizer`] nor [`EntityExtractor`] fail outward: a network error,
//! a non-JSON answer or an incomplete note sends the synthesizer to the
//! keyword-based [`fallback`] extractor and the entity extractor to an empty,
//! zero-confidence answer. Which path produced a value is recorded in
//! [`Synthesized::source`].
//!
//! # Example
//!
//! ```rust,no_run
//! use clinical_notes::{validate, CompletionConfig, NoteSynthesizer, OpenAiCompletionClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), clinical_notes::CompletionError> {
//! let client = Arc::new(OpenAiCompletionClient::new(&CompletionConfig::from_env())?);
//! let synthesizer = NoteSynthesizer::new(client);
//!
//! let note = synthesizer
//!     .synthesize("Patient states pain is worsening. Will increase morphine.", None)
//!     .await;
//! let report = validate(&note.value);
//! println!("{} note, valid: {}", note.source, report.is_valid);
//! # Ok(())
//! # }
//! ```

pub mod completion;
pub mod entities;
pub mod error;
pub mod fallback;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod prompts;
pub mod synthesizer;
pub mod validator;

pub use completion::*;
pub use entities::EntityExtractor;
pub use error::*;
pub use models::*;
pub use pipeline::*;
pub use synthesizer::NoteSynthesizer;
pub use validator::validate;
