use crate::error::McpResult;
use crate::render::{bullet_list, count_noun, dual_format};
use crate::tools::{bounded_limit, parse_args, require_text, McpTool};
use async_trait::async_trait;
use chrono::Utc;
use clinical_notes::{validate, NoteSynthesizer, PatientContext};
use database_layer::{fetch_all, fetch_by_id, tables, Datastore, Direction, Patient, Query, Visit};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const VISITS_DEFAULT_LIMIT: usize = 10;
const VISITS_MAX_LIMIT: usize = 100;
const DEFAULT_VISIT_TYPE: &str = "routine";

/// Prompt context built from a patient row
pub fn patient_context(patient: &Patient) -> PatientContext {
    PatientContext {
        name: patient.name.clone(),
        primary_condition: patient.primary_condition.clone(),
        current_symptoms: patient.current_symptoms.clone(),
        current_medications: patient.current_medications.clone(),
    }
}

pub(crate) fn visit_line(visit: &Visit) -> String {
    let source = visit
        .note_source
        .as_deref()
        .map(|source| format!(", {source} note"))
        .unwrap_or_default();
    format!("{} {} visit{source}", visit.visit_date.format("%Y-%m-%d %H:%M"), visit.visit_type)
}

pub struct GetPatientVisits {
    store: Arc<dyn Datastore>,
}

impl GetPatientVisits {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct VisitsArgs {
    patient_id: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[async_trait]
impl McpTool for GetPatientVisits {
    fn name(&self) -> &str {
        "get_patient_visits"
    }

    fn description(&self) -> &str {
        "List a patient's visits, most recent first"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "patient_id": {"type": "string"},
                "limit": {"type": "integer", "minimum": 1, "maximum": VISITS_MAX_LIMIT, "default": VISITS_DEFAULT_LIMIT}
            },
            "required": ["patient_id"]
        })
    }

    async fn call(&self, arguments: Value) -> McpResult<String> {
        let args: VisitsArgs = parse_args(self.name(), arguments)?;
        require_text(self.name(), "patient_id", &args.patient_id)?;

        let visits: Vec<Visit> = fetch_all(
            self.store.as_ref(),
            &Query::table(tables::VISITS)
                .eq("patient_id", args.patient_id.as_str())
                .order_by("visit_date", Direction::Descending)
                .limit(bounded_limit(args.limit, VISITS_DEFAULT_LIMIT, VISITS_MAX_LIMIT)),
        )
        .await?;

        let summary = format!(
            "{} for patient {}\n{}",
            count_noun(visits.len(), "visit", "visits"),
            args.patient_id,
            bullet_list(visits.iter().map(visit_line), "No visits recorded.")
        );
        dual_format(&summary, &visits)
    }
}

pub struct CreateVisitNote {
    store: Arc<dyn Datastore>,
    synthesizer: NoteSynthesizer,
}

impl CreateVisitNote {
    pub fn new(store: Arc<dyn Datastore>, synthesizer: NoteSynthesizer) -> Self {
        Self { store, synthesizer }
    }
}

#[derive(Deserialize)]
struct CreateVisitArgs {
    patient_id: String,
    transcript: String,
    #[serde(default)]
    visit_type: Option<String>,
}

#[async_trait]
impl McpTool for CreateVisitNote {
    fn name(&self) -> &str {
        "create_visit_note"
    }

    fn description(&self) -> &str {
        "Structure a visit transcript into a SOAP note, check its completeness and store the visit"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "patient_id": {"type": "string"},
                "transcript": {"type": "string", "description": "Visit transcript text"},
                "visit_type": {"type": "string", "default": DEFAULT_VISIT_TYPE}
            },
            "required": ["patient_id", "transcript"]
        })
    }

    async fn call(&self, arguments: Value) -> McpResult<String> {
        let args: CreateVisitArgs = parse_args(self.name(), arguments)?;
        require_text(self.name(), "patient_id", &args.patient_id)?;
        require_text(self.name(), "transcript", &args.transcript)?;

        let patient: Patient = fetch_by_id(self.store.as_ref(), tables::PATIENTS, &args.patient_id).await?;
        let context = patient_context(&patient);

        let note = self.synthesizer.synthesize(&args.transcript, Some(&context)).await;
        let validation = validate(&note.value);

        let visit_type = args
            .visit_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_VISIT_TYPE.to_string());

        let row = self
            .store
            .insert(
                tables::VISITS,
                json!({
                    "patient_id": patient.id,
                    "visit_type": visit_type,
                    "visit_date": Utc::now(),
                    "transcript": args.transcript,
                    "clinical_note": note.value,
                    "note_source": note.source,
                    "validation": validation,
                }),
            )
            .await?;
        let visit: Visit = serde_json::from_value(row)?;

        let completeness = if validation.is_valid {
            "All SOAP sections are complete.".to_string()
        } else {
            format!(
                "Incomplete sections: {}\n{}",
                validation.missing_fields.join(", "),
                bullet_list(&validation.suggestions, "")
            )
        };
        let summary = format!(
            "Created {} visit note for {} ({} note).\n{completeness}",
            visit.visit_type, patient.name, note.source
        );

        dual_format(
            &summary,
            &json!({
                "visit": visit,
                "note": note,
                "validation": validation,
            }),
        )
    }
}
