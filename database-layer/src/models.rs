// Datastore records shared by the pipeline and the dispatch server
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

pub mod tables {
    pub const PATIENTS: &str = "patients";
    pub const TASKS: &str = "tasks";
    pub const VISITS: &str = "visits";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatientStatus {
    #[default]
    Active,
    Discharged,
    Deceased,
}

impl PatientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Discharged => "discharged",
            Self::Deceased => "deceased",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub primary_condition: String,
    #[serde(default)]
    pub status: PatientStatus,
    #[serde(default)]
    pub current_symptoms: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub admission_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub const OPEN: [TaskStatus; 2] = [TaskStatus::Pending, TaskStatus::InProgress];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_open(self) -> bool {
        Self::OPEN.contains(&self)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored as an integer so that "order by priority desc" ranks urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskPriority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl TaskPriority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl TryFrom<u8> for TaskPriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            4 => Ok(Self::Urgent),
            other => Err(format!("priority must be between 1 and 4, got {other}")),
        }
    }
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> Self {
        priority as u8
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Patient columns embedded into task and visit rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareTask {
    pub id: String,
    pub patient_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patients: Option<PatientRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub visit_type: String,
    pub visit_date: DateTime<Utc>,
    #[serde(default)]
    pub transcript: Option<String>,
    /// Stored clinical note document; owned by the datastore once written
    #[serde(default)]
    pub clinical_note: Option<JsonValue>,
    #[serde(default)]
    pub note_source: Option<String>,
    #[serde(default)]
    pub validation: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patients: Option<PatientRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_status_wire_names() {
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), json!("inProgress"));
        let status: TaskStatus = serde_json::from_value(json!("pending")).unwrap();
        assert_eq!(status, TaskStatus::Pending);
        assert!(status.is_open());
        assert!(!TaskStatus::Completed.is_open());
    }

    #[test]
    fn test_priority_is_numeric_on_the_wire() {
        assert_eq!(serde_json::to_value(TaskPriority::Urgent).unwrap(), json!(4));
        assert!(serde_json::from_value::<TaskPriority>(json!(7)).is_err());
        assert!(TaskPriority::Urgent > TaskPriority::High);
    }

    #[test]
    fn test_task_row_with_embedded_patient() {
        let task: CareTask = serde_json::from_value(json!({
            "id": "t1",
            "patient_id": "p1",
            "title": "Reassess pain",
            "status": "inProgress",
            "priority": 3,
            "due_date": "2026-10-20",
            "patients": {"name": "Ada Lovelace"}
        }))
        .unwrap();
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.patients.unwrap().name, "Ada Lovelace");
    }
}
