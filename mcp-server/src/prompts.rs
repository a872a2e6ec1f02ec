//! Prompt templates offered to MCP clients. Pure interpolation, no I/O.
use crate::error::{McpError, McpResult};
use crate::protocol::{Content, PromptArgument, PromptDescriptor, PromptMessage};
use serde::Serialize;
use std::collections::HashMap;

type PromptArgs = HashMap<String, String>;

struct ArgSpec {
    name: &'static str,
    description: &'static str,
    required: bool,
}

struct PromptTemplate {
    name: &'static str,
    description: &'static str,
    arguments: &'static [ArgSpec],
    render: fn(&PromptArgs) -> String,
}

fn arg<'a>(args: &'a PromptArgs, name: &str) -> &'a str {
    args.get(name).map_or("", String::as_str)
}

fn soap_note_review(args: &PromptArgs) -> String {
    format!(
        "Review the following hospice SOAP note for completeness and clarity.\n\
         For each section (Subjective, Objective, Assessment, Plan) say whether it is documented, \
         point out vague wording, and list anything a reviewer would expect but cannot find. \
         Do not add clinical findings that are not in the note.\n\nNote:\n{}",
        arg(args, "note")
    )
}

fn care_plan_summary(args: &PromptArgs) -> String {
    let symptoms = match arg(args, "symptoms").trim() {
        "" => "not provided".to_string(),
        listed => listed.to_string(),
    };
    format!(
        "Write a concise care plan summary for {}, a hospice patient with {}.\n\
         Current symptoms: {symptoms}.\n\
         Organize it as: comfort goals, symptom management, psychosocial and spiritual support, \
         and caregiver support. Keep the language suitable for the interdisciplinary team.",
        arg(args, "patient_name"),
        arg(args, "primary_condition"),
    )
}

fn symptom_assessment(args: &PromptArgs) -> String {
    format!(
        "Guide a symptom assessment for {} using the Edmonton Symptom Assessment System (ESAS).\n\
         Ask about each item on a 0 to 10 scale: pain, tiredness, drowsiness, nausea, lack of appetite, \
         shortness of breath, depression, anxiety and wellbeing. Then ask about any other problem. \
         Summarize scores of 4 or more as symptoms needing attention.",
        arg(args, "patient_name")
    )
}

fn family_communication(args: &PromptArgs) -> String {
    format!(
        "Help prepare a conversation with the family of {} about: {}.\n\
         Use plain, compassionate language. Start by asking what the family already understands, \
         share information in small pieces, check for questions, and name the support available \
         from the hospice team, including chaplain, social work and bereavement services.",
        arg(args, "patient_name"),
        arg(args, "topic"),
    )
}

const TEMPLATES: &[PromptTemplate] = &[
    PromptTemplate {
        name: "soap_note_review",
        description: "Review a SOAP note for completeness and clarity",
        arguments: &[ArgSpec {
            name: "note",
            description: "The SOAP note text or JSON",
            required: true,
        }],
        render: soap_note_review,
    },
    PromptTemplate {
        name: "care_plan_summary",
        description: "Summarize a hospice care plan for the interdisciplinary team",
        arguments: &[
            ArgSpec {
                name: "patient_name",
                description: "Patient name",
                required: true,
            },
            ArgSpec {
                name: "primary_condition",
                description: "Primary hospice diagnosis",
                required: true,
            },
            ArgSpec {
                name: "symptoms",
                description: "Comma-separated current symptoms",
                required: false,
            },
        ],
        render: care_plan_summary,
    },
    PromptTemplate {
        name: "symptom_assessment",
        description: "Structured ESAS symptom assessment",
        arguments: &[ArgSpec {
            name: "patient_name",
            description: "Patient name",
            required: true,
        }],
        render: symptom_assessment,
    },
    PromptTemplate {
        name: "family_communication",
        description: "Prepare a compassionate conversation with a patient's family",
        arguments: &[
            ArgSpec {
                name: "patient_name",
                description: "Patient name",
                required: true,
            },
            ArgSpec {
                name: "topic",
                description: "What the conversation is about",
                required: true,
            },
        ],
        render: family_communication,
    },
];

impl PromptTemplate {
    fn descriptor(&self) -> PromptDescriptor {
        PromptDescriptor {
            name: self.name.to_string(),
            description: self.description.to_string(),
            arguments: self
                .arguments
                .iter()
                .map(|spec| PromptArgument {
                    name: spec.name.to_string(),
                    description: spec.description.to_string(),
                    required: spec.required,
                })
                .collect(),
        }
    }
}

/// Reply of `prompts/get`
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPrompt {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

/// Prompt templates keyed by name
pub struct PromptCatalog {
    by_name: HashMap<&'static str, &'static PromptTemplate>,
}

impl PromptCatalog {
    pub fn new() -> Self {
        Self {
            by_name: TEMPLATES.iter().map(|template| (template.name, template)).collect(),
        }
    }

    pub fn list(&self) -> Vec<PromptDescriptor> {
        TEMPLATES.iter().map(PromptTemplate::descriptor).collect()
    }

    pub fn get(&self, name: &str, args: &PromptArgs) -> McpResult<RenderedPrompt> {
        let template = self
            .by_name
            .get(name)
            .ok_or_else(|| McpError::UnknownPrompt(name.to_string()))?;

        if let Some(missing) = template
            .arguments
            .iter()
            .find(|spec| spec.required && args.get(spec.name).map_or(true, |v| v.trim().is_empty()))
        {
            return Err(McpError::InvalidParams(format!(
                "prompt '{name}' requires argument '{}'",
                missing.name
            )));
        }

        Ok(RenderedPrompt {
            description: template.description.to_string(),
            messages: vec![PromptMessage {
                role: "user".to_string(),
                content: Content::text((template.render)(args)),
            }],
        })
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::new()
    }
}
