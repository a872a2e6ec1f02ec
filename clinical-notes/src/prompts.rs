// Fixed prompt templates for the generative backend
use crate::completion::CompletionPrompt;
use crate::models::PatientContext;

pub const NOTE_TEMPERATURE: f32 = 0.3;
pub const NOTE_MAX_TOKENS: u32 = 2000;
pub const ENTITY_TEMPERATURE: f32 = 0.1;
pub const ENTITY_MAX_TOKENS: u32 = 1000;

const NOTE_SYSTEM: &str = "You are a documentation assistant for hospice and palliative care nurses. \
Structure the visit transcript into a SOAP note. Use only information stated in the transcript and \
the patient context. Do not add diagnoses, prognoses or treatment advice that the nurse did not state. \
Write in concise clinical language.";

pub const NOTE_SCHEMA_HINT: &str = r#"{
  "soap": {
    "subjective": "string: what the patient or family reported",
    "objective": "string: what the nurse observed or measured",
    "assessment": "string: the nurse's stated assessment of status",
    "plan": "string: actions, orders and follow-up stated in the visit"
  },
  "visitSummary": "string: two or three sentence summary",
  "recommendations": ["string"],
  "followUpActions": ["string"],
  "clinicalEntities": {
    "symptoms": ["string"],
    "medications": ["string"],
    "interventions": ["string"],
    "assessments": ["string"]
  }
}"#;

const ENTITY_SYSTEM: &str = "You extract clinical entities from hospice visit text. \
List only entities literally present in the text. Report your confidence in the extraction \
as a number between 0 and 1.";

pub const ENTITY_SCHEMA_HINT: &str = r#"{
  "symptoms": ["string"],
  "medications": ["string: name with dose and route when stated"],
  "vitals": ["string: measurement with value"],
  "interventions": ["string"],
  "confidence": 0.0
}"#;

fn context_block(context: &PatientContext) -> String {
    let or_none = |items: &[String]| {
        if items.is_empty() {
            "none recorded".to_string()
        } else {
            items.join(", ")
        }
    };
    format!(
        "Patient: {}\nPrimary condition: {}\nCurrent symptoms: {}\nCurrent medications: {}",
        context.name,
        context.primary_condition,
        or_none(&context.current_symptoms),
        or_none(&context.current_medications),
    )
}

pub fn note_prompt(transcript: &str, context: Option<&PatientContext>) -> CompletionPrompt {
    let context = context.map_or_else(|| "No patient context provided.".to_string(), context_block);
    CompletionPrompt {
        system: NOTE_SYSTEM.to_string(),
        user: format!("{context}\n\nVisit transcript:\n\"\"\"\n{transcript}\n\"\"\""),
        temperature: NOTE_TEMPERATURE,
        max_tokens: NOTE_MAX_TOKENS,
    }
}

pub fn entity_prompt(text: &str) -> CompletionPrompt {
    CompletionPrompt {
        system: ENTITY_SYSTEM.to_string(),
        user: format!("Text:\n\"\"\"\n{text}\n\"\"\""),
        temperature: ENTITY_TEMPERATURE,
        max_tokens: ENTITY_MAX_TOKENS,
    }
}
