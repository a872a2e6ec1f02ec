use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Treat an explicit JSON `null` like an absent field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoapNote {
    #[serde(default, deserialize_with = "null_as_default")]
    pub subjective: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub objective: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assessment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan: String,
}

impl SoapNote {
    /// Fields paired with their display labels, in S/O/A/P order
    pub fn sections(&self) -> [(&'static str, &str); 4] {
        [
            ("Subjective", self.subjective.as_str()),
            ("Objective", self.objective.as_str()),
            ("Assessment", self.assessment.as_str()),
            ("Plan", self.plan.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalEntities {
    #[serde(default, deserialize_with = "null_as_default")]
    pub symptoms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medications: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interventions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assessments: Vec<String>,
}

/// Structured documentation of one visit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalNote {
    #[serde(default)]
    pub soap: Option<SoapNote>,
    #[serde(default)]
    pub visit_summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub follow_up_actions: Vec<String>,
    #[serde(default)]
    pub clinical_entities: Option<ClinicalEntities>,
}

/// Entities pulled out of free text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityExtraction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub symptoms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medications: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vitals: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interventions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
}

/// Mechanical completeness report; derived from a note, never authoritative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub missing_fields: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Patient details embedded into the synthesis prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientContext {
    pub name: String,
    pub primary_condition: String,
    #[serde(default)]
    pub current_symptoms: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSource {
    Generated,
    Fallback,
}

impl NoteSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for NoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that is always usable, tagged with how it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synthesized<T> {
    pub value: T,
    pub source: NoteSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl<T> Synthesized<T> {
    pub fn generated(value: T) -> Self {
        Self {
            value,
            source: NoteSource::Generated,
            fallback_reason: None,
        }
    }

    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            source: NoteSource::Fallback,
            fallback_reason: Some(reason.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == NoteSource::Fallback
    }
}
