use crate::error::McpResult;
use crate::render::{bullet_list, dual_format, inline_list};
use crate::tools::{parse_args, require_text, McpTool};
use async_trait::async_trait;
use clinical_notes::{validate, ClinicalNote, EntityExtractor};
use serde::Deserialize;
use serde_json::{json, Value};

pub struct ExtractClinicalEntities {
    extractor: EntityExtractor,
}

impl ExtractClinicalEntities {
    pub fn new(extractor: EntityExtractor) -> Self {
        Self { extractor }
    }
}

#[derive(Deserialize)]
struct TextArgs {
    text: String,
}

#[async_trait]
impl McpTool for ExtractClinicalEntities {
    fn name(&self) -> &str {
        "extract_clinical_entities"
    }

    fn description(&self) -> &str {
        "Extract symptoms, medications, vital signs and interventions from clinical text"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "Clinical text to analyze"}
            },
            "required": ["text"]
        })
    }

    async fn call(&self, arguments: Value) -> McpResult<String> {
        let args: TextArgs = parse_args(self.name(), arguments)?;
        require_text(self.name(), "text", &args.text)?;

        let extraction = self.extractor.extract(&args.text).await;
        let entities = &extraction.value;

        let summary = format!(
            "Entities ({} extraction, confidence {:.2})\nSymptoms: {}\nMedications: {}\nVitals: {}\nInterventions: {}",
            extraction.source,
            entities.confidence,
            inline_list(&entities.symptoms),
            inline_list(&entities.medications),
            inline_list(&entities.vitals),
            inline_list(&entities.interventions),
        );
        dual_format(&summary, &extraction)
    }
}

/// Pure completeness check, no I/O
pub struct ValidateClinicalNote;

#[derive(Deserialize)]
struct NoteArgs {
    note: ClinicalNote,
}

#[async_trait]
impl McpTool for ValidateClinicalNote {
    fn name(&self) -> &str {
        "validate_clinical_note"
    }

    fn description(&self) -> &str {
        "Check that each SOAP section of a clinical note is filled in"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "note": {
                    "type": "object",
                    "description": "Clinical note with a soap object holding subjective, objective, assessment and plan"
                }
            },
            "required": ["note"]
        })
    }

    async fn call(&self, arguments: Value) -> McpResult<String> {
        let args: NoteArgs = parse_args(self.name(), arguments)?;
        let report = validate(&args.note);

        let summary = if report.is_valid {
            "Note is complete: all SOAP sections are documented.".to_string()
        } else {
            format!(
                "Note is incomplete. Missing: {}\n{}",
                report.missing_fields.join(", "),
                bullet_list(&report.suggestions, "")
            )
        };
        dual_format(&summary, &report)
    }
}
