use crate::completion::CompletionClient;
use crate::error::SynthesisError;
use crate::fallback;
use crate::models::{ClinicalNote, PatientContext, Synthesized};
use crate::parse::extract_json_object;
use crate::prompts::{note_prompt, NOTE_SCHEMA_HINT};
use error_common::log_error;
use logger_redacted::redact_preview;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Turns a transcript into a SOAP note. Never fails: when the generative
/// answer is unusable the keyword fallback is returned instead, tagged as such.
#[derive(Clone)]
pub struct NoteSynthesizer {
    client: Arc<dyn CompletionClient>,
}

impl NoteSynthesizer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    #[instrument(skip_all, fields(chars = transcript.len(), has_context = context.is_some()))]
    pub async fn synthesize(&self, transcript: &str, context: Option<&PatientContext>) -> Synthesized<ClinicalNote> {
        debug!(preview = %redact_preview(transcript, 60), "Synthesizing clinical note");

        match self.generate(transcript, context).await {
            Ok(note) => {
                info!(source = "generated", "Clinical note synthesized");
                Synthesized::generated(note)
            }
            Err(err) => {
                log_error("note synthesis", &err);
                info!(source = "fallback", "Clinical note built by keyword extraction");
                Synthesized::fallback(fallback::extract(transcript), err.to_string())
            }
        }
    }

    async fn generate(&self, transcript: &str, context: Option<&PatientContext>) -> Result<ClinicalNote, SynthesisError> {
        let prompt = note_prompt(transcript, context);
        let text = self.client.complete(&prompt, NOTE_SCHEMA_HINT).await?;
        let json = extract_json_object(&text).ok_or(SynthesisError::NoJsonObject)?;
        let note: ClinicalNote = serde_json::from_str(json)?;
        check_complete(&note)?;
        Ok(note)
    }
}

fn check_complete(note: &ClinicalNote) -> Result<(), SynthesisError> {
    let soap = note
        .soap
        .as_ref()
        .ok_or_else(|| SynthesisError::Incomplete("soap is missing".into()))?;

    match soap.sections().into_iter().find(|(_, text)| text.trim().is_empty()) {
        Some((label, _)) => Err(SynthesisError::Incomplete(format!(
            "{} is empty",
            label.to_lowercase()
        ))),
        None => Ok(()),
    }
}
