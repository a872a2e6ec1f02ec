use crate::error::McpResult;
use crate::render::{bullet_list, count_noun, dual_format, inline_list};
use crate::tools::{bounded_limit, parse_args, require_text, McpTool};
use async_trait::async_trait;
use database_layer::{fetch_all, fetch_by_id, tables, Datastore, Direction, Patient, PatientStatus, Query, Visit};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const RECENT_VISITS: usize = 5;
const SEARCH_DEFAULT_LIMIT: usize = 20;
const SEARCH_MAX_LIMIT: usize = 100;

pub(crate) fn patient_line(patient: &Patient) -> String {
    let room = patient
        .room_number
        .as_deref()
        .map(|room| format!(", room {room}"))
        .unwrap_or_default();
    format!(
        "{} ({}): {}{}",
        patient.name,
        patient.status,
        patient.primary_condition,
        room
    )
}

pub struct GetPatientInfo {
    store: Arc<dyn Datastore>,
}

impl GetPatientInfo {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct PatientIdArgs {
    patient_id: String,
}

#[async_trait]
impl McpTool for GetPatientInfo {
    fn name(&self) -> &str {
        "get_patient_info"
    }

    fn description(&self) -> &str {
        "Get a patient's record with current symptoms, medications and the most recent visits"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "patient_id": {"type": "string", "description": "Patient ID"}
            },
            "required": ["patient_id"]
        })
    }

    async fn call(&self, arguments: Value) -> McpResult<String> {
        let args: PatientIdArgs = parse_args(self.name(), arguments)?;
        require_text(self.name(), "patient_id", &args.patient_id)?;

        let patient: Patient = fetch_by_id(self.store.as_ref(), tables::PATIENTS, &args.patient_id).await?;
        let visits: Vec<Visit> = fetch_all(
            self.store.as_ref(),
            &Query::table(tables::VISITS)
                .eq("patient_id", args.patient_id.as_str())
                .order_by("visit_date", Direction::Descending)
                .limit(RECENT_VISITS),
        )
        .await?;

        let summary = format!(
            "{}\nCurrent symptoms: {}\nCurrent medications: {}\nRecent visits: {}",
            patient_line(&patient),
            inline_list(&patient.current_symptoms),
            inline_list(&patient.current_medications),
            count_noun(visits.len(), "visit", "visits"),
        );

        dual_format(&summary, &json!({ "patient": patient, "recentVisits": visits }))
    }
}

pub struct SearchPatients {
    store: Arc<dyn Datastore>,
}

impl SearchPatients {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct SearchArgs {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    status: Option<PatientStatus>,
    #[serde(default)]
    limit: Option<usize>,
}

#[async_trait]
impl McpTool for SearchPatients {
    fn name(&self) -> &str {
        "search_patients"
    }

    fn description(&self) -> &str {
        "Search patients by name and/or status"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Case-insensitive name fragment"},
                "status": {"type": "string", "enum": ["active", "discharged", "deceased"]},
                "limit": {"type": "integer", "minimum": 1, "maximum": SEARCH_MAX_LIMIT, "default": SEARCH_DEFAULT_LIMIT}
            }
        })
    }

    async fn call(&self, arguments: Value) -> McpResult<String> {
        let args: SearchArgs = parse_args(self.name(), arguments)?;

        let mut query = Query::table(tables::PATIENTS)
            .order_by("name", Direction::Ascending)
            .limit(bounded_limit(args.limit, SEARCH_DEFAULT_LIMIT, SEARCH_MAX_LIMIT));
        if let Some(needle) = args.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            query = query.ilike("name", needle);
        }
        if let Some(status) = args.status {
            query = query.eq("status", status.as_str());
        }

        let patients: Vec<Patient> = fetch_all(self.store.as_ref(), &query).await?;

        let heading = match args.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(needle) => format!(
                "Found {} matching \"{needle}\"",
                count_noun(patients.len(), "patient", "patients")
            ),
            None => format!("Found {}", count_noun(patients.len(), "patient", "patients")),
        };
        let summary = format!(
            "{heading}\n{}",
            bullet_list(patients.iter().map(patient_line), "No patients matched.")
        );

        dual_format(&summary, &patients)
    }
}
