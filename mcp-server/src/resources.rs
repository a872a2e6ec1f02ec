//! Read-only MCP resources
use crate::error::{McpError, McpResult};
use crate::protocol::{ResourceContents, ResourceDescriptor};
use crate::tools::tasks::open_tasks_query;
use database_layer::{tables, Datastore, Direction, PatientStatus, Query};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub const ACTIVE_PATIENTS_URI: &str = "medical://patients/active";
pub const PENDING_TASKS_URI: &str = "medical://tasks/pending";
pub const RECENT_VISITS_URI: &str = "medical://visits/recent";
pub const GUIDELINES_URI: &str = "medical://guidelines/palliative-care";

const PENDING_TASKS_LIMIT: usize = 50;
const RECENT_VISITS_LIMIT: usize = 20;

pub const PALLIATIVE_CARE_GUIDELINES: &str = r"# Palliative Care Nursing Guidelines

## Symptom assessment
- Assess symptoms at every visit with the Edmonton Symptom Assessment System (ESAS):
  pain, tiredness, drowsiness, nausea, appetite, shortness of breath, depression,
  anxiety and wellbeing, each rated 0 to 10.
- Record the Palliative Performance Scale (PPS) when function changes.
- For patients who cannot self-report, use observational scales such as PAINAD.

## Pain management
- Treat pain rated 4 or above as uncontrolled and report it to the hospice physician.
- Document breakthrough doses given since the last visit and their effect.
- Watch for opioid side effects: constipation, sedation, myoclonus, delirium.

## Dyspnea and secretions
- Position upright, use a fan toward the face, and follow orders for low-dose opioids.
- Terminal secretions: reposition, limit suctioning, use anticholinergics as ordered.

## Signs of approaching death
- Mottling, cool extremities, Cheyne-Stokes respirations, decreased urine output,
  prolonged periods of sleep or unresponsiveness.
- Increase visit frequency and prepare the family for what to expect.

## Family and caregiver support
- Ask about caregiver strain at each visit and offer respite care when needed.
- Confirm that the advance directive and DNR status are documented and known to the family.
- Offer chaplain, social work and bereavement services.

## Documentation
- Write each visit as a SOAP note: Subjective, Objective, Assessment, Plan.
- Document only what was reported, observed or decided during the visit.
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceKind {
    ActivePatients,
    PendingTasks,
    RecentVisits,
    Guidelines,
}

impl ResourceKind {
    const ALL: [ResourceKind; 4] = [
        Self::ActivePatients,
        Self::PendingTasks,
        Self::RecentVisits,
        Self::Guidelines,
    ];

    fn descriptor(self) -> ResourceDescriptor {
        let (uri, name, description, mime_type) = match self {
            Self::ActivePatients => (
                ACTIVE_PATIENTS_URI,
                "Active patients",
                "All patients currently receiving hospice care",
                "application/json",
            ),
            Self::PendingTasks => (
                PENDING_TASKS_URI,
                "Pending tasks",
                "Open care tasks ordered by priority, with patient names",
                "application/json",
            ),
            Self::RecentVisits => (
                RECENT_VISITS_URI,
                "Recent visits",
                "Most recent visits across all patients",
                "application/json",
            ),
            Self::Guidelines => (
                GUIDELINES_URI,
                "Palliative care guidelines",
                "Nursing reference for symptom assessment and comfort care",
                "text/markdown",
            ),
        };
        ResourceDescriptor {
            uri: uri.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: mime_type.to_string(),
        }
    }

    fn query(self) -> Option<Query> {
        match self {
            Self::ActivePatients => Some(
                Query::table(tables::PATIENTS)
                    .eq("status", PatientStatus::Active.as_str())
                    .order_by("name", Direction::Ascending),
            ),
            Self::PendingTasks => Some(open_tasks_query(PENDING_TASKS_LIMIT)),
            Self::RecentVisits => Some(
                Query::table(tables::VISITS)
                    .columns(&["id", "patient_id", "visit_type", "visit_date", "note_source"])
                    .order_by("visit_date", Direction::Descending)
                    .limit(RECENT_VISITS_LIMIT)
                    .embed(tables::PATIENTS, "patient_id", &["name"]),
            ),
            Self::Guidelines => None,
        }
    }
}

/// Resources keyed by URI, built once at startup
pub struct ResourceCatalog {
    store: Arc<dyn Datastore>,
    by_uri: HashMap<String, ResourceKind>,
}

impl ResourceCatalog {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        let by_uri = ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind.descriptor().uri, kind))
            .collect();
        Self { store, by_uri }
    }

    pub fn list(&self) -> Vec<ResourceDescriptor> {
        ResourceKind::ALL.into_iter().map(ResourceKind::descriptor).collect()
    }

    /// Live query for data resources; the guideline document involves no I/O
    pub async fn read(&self, uri: &str) -> McpResult<ResourceContents> {
        let kind = *self
            .by_uri
            .get(uri)
            .ok_or_else(|| McpError::UnknownResource(uri.to_string()))?;
        let descriptor = kind.descriptor();

        let text = match kind.query() {
            None => PALLIATIVE_CARE_GUIDELINES.to_string(),
            Some(query) => {
                debug!(uri, table = %query.table, "Reading resource");
                let rows = self.store.select(&query).await?;
                serde_json::to_string_pretty(&rows)?
            }
        };

        Ok(ResourceContents {
            uri: descriptor.uri,
            mime_type: descriptor.mime_type,
            text,
        })
    }
}
