use crate::completion::CompletionClient;
use crate::error::SynthesisError;
use crate::models::{EntityExtraction, Synthesized};
use crate::parse::extract_json_object;
use crate::prompts::{entity_prompt, ENTITY_SCHEMA_HINT};
use error_common::log_error;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Pulls symptoms, medications, vitals and interventions out of free text.
/// Any failure degrades to an empty, zero-confidence answer.
#[derive(Clone)]
pub struct EntityExtractor {
    client: Arc<dyn CompletionClient>,
}

impl EntityExtractor {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    #[instrument(skip_all, fields(chars = text.len()))]
    pub async fn extract(&self, text: &str) -> Synthesized<EntityExtraction> {
        match self.generate(text).await {
            Ok(extraction) => {
                debug!(confidence = extraction.confidence, "Entities extracted");
                Synthesized::generated(extraction)
            }
            Err(err) => {
                log_error("entity extraction", &err);
                Synthesized::fallback(EntityExtraction::default(), err.to_string())
            }
        }
    }

    async fn generate(&self, text: &str) -> Result<EntityExtraction, SynthesisError> {
        let completion = self.client.complete(&entity_prompt(text), ENTITY_SCHEMA_HINT).await?;
        let json = extract_json_object(&completion).ok_or(SynthesisError::NoJsonObject)?;
        let mut extraction: EntityExtraction = serde_json::from_str(json)?;
        extraction.confidence = if extraction.confidence.is_finite() {
            extraction.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Ok(extraction)
    }
}
