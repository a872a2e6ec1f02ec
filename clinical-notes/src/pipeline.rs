use crate::entities::EntityExtractor;
use crate::models::{ClinicalNote, EntityExtraction, PatientContext, Synthesized, ValidationReport};
use crate::synthesizer::NoteSynthesizer;
use crate::validator::validate;
use serde::Serialize;
use tracing::{info, instrument};
use voice_recognition_service::{AudioPayload, Transcript, TranscriptionResult, TranscriptionService};

/// Everything produced for one recorded visit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDocumentation {
    pub transcript: Transcript,
    pub note: Synthesized<ClinicalNote>,
    pub validation: ValidationReport,
    pub entities: Synthesized<EntityExtraction>,
}

/// Audio → transcript → note → validation → entities, strictly in sequence
pub struct VisitPipeline {
    transcription: TranscriptionService,
    synthesizer: NoteSynthesizer,
    extractor: EntityExtractor,
}

impl VisitPipeline {
    pub fn new(transcription: TranscriptionService, synthesizer: NoteSynthesizer, extractor: EntityExtractor) -> Self {
        Self {
            transcription,
            synthesizer,
            extractor,
        }
    }

    /// Only transcription can fail; later steps degrade instead
    #[instrument(skip_all)]
    pub async fn document_visit(
        &self,
        audio: &AudioPayload,
        context: Option<&PatientContext>,
    ) -> TranscriptionResult<VisitDocumentation> {
        let transcript = self.transcription.transcribe(audio).await?;
        Ok(self.document_transcript(transcript, context).await)
    }

    /// Run the post-transcription steps on an existing transcript
    pub async fn document_transcript(&self, transcript: Transcript, context: Option<&PatientContext>) -> VisitDocumentation {
        let note = self.synthesizer.synthesize(&transcript.text, context).await;
        let validation = validate(&note.value);
        let entities = self.extractor.extract(&transcript.text).await;

        info!(
            note_source = %note.source,
            entity_source = %entities.source,
            valid = validation.is_valid,
            missing = validation.missing_fields.len(),
            "Visit documented"
        );

        VisitDocumentation {
            transcript,
            note,
            validation,
            entities,
        }
    }
}
