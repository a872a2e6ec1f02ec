use crate::error::McpResult;
use crate::render::{bullet_list, count_noun, dual_format};
use crate::tools::{bounded_limit, parse_args, require_text, McpTool};
use async_trait::async_trait;
use chrono::NaiveDate;
use database_layer::{
    fetch_all, fetch_by_id, tables, CareTask, Datastore, Direction, Patient, Query, TaskPriority, TaskStatus,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const PENDING_DEFAULT_LIMIT: usize = 10;
const PENDING_MAX_LIMIT: usize = 100;

pub(crate) fn task_line(task: &CareTask) -> String {
    let patient = task
        .patients
        .as_ref()
        .map(|p| format!(" for {}", p.name))
        .unwrap_or_default();
    let due = task.due_date.map(|d| format!(", due {d}")).unwrap_or_default();
    format!("[{}] {}{patient} ({}{due})", task.priority, task.title, task.status)
}

/// Open tasks (pending or in progress), most urgent first, with patient names
pub(crate) fn open_tasks_query(limit: usize) -> Query {
    Query::table(tables::TASKS)
        .in_list("status", TaskStatus::OPEN.map(TaskStatus::as_str))
        .order_by("priority", Direction::Descending)
        .limit(limit)
        .embed(tables::PATIENTS, "patient_id", &["name"])
}

pub struct GetPendingTasksSummary {
    store: Arc<dyn Datastore>,
}

impl GetPendingTasksSummary {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct PendingArgs {
    #[serde(default)]
    limit: Option<usize>,
}

#[async_trait]
impl McpTool for GetPendingTasksSummary {
    fn name(&self) -> &str {
        "get_pending_tasks_summary"
    }

    fn description(&self) -> &str {
        "Summarize open care tasks (pending or in progress), highest priority first"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {"type": "integer", "minimum": 1, "maximum": PENDING_MAX_LIMIT, "default": PENDING_DEFAULT_LIMIT}
            }
        })
    }

    async fn call(&self, arguments: Value) -> McpResult<String> {
        let args: PendingArgs = parse_args(self.name(), arguments)?;
        let limit = bounded_limit(args.limit, PENDING_DEFAULT_LIMIT, PENDING_MAX_LIMIT);

        let tasks: Vec<CareTask> = fetch_all(self.store.as_ref(), &open_tasks_query(limit)).await?;

        let urgent = tasks.iter().filter(|t| t.priority == TaskPriority::Urgent).count();
        let summary = format!(
            "{} open ({urgent} urgent)\n{}",
            count_noun(tasks.len(), "task", "tasks"),
            bullet_list(tasks.iter().map(task_line), "No open tasks.")
        );

        dual_format(&summary, &tasks)
    }
}

pub struct CreateTask {
    store: Arc<dyn Datastore>,
}

impl CreateTask {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct CreateTaskArgs {
    patient_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Option<TaskPriority>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    assigned_to: Option<String>,
}

#[async_trait]
impl McpTool for CreateTask {
    fn name(&self) -> &str {
        "create_task"
    }

    fn description(&self) -> &str {
        "Create a care task for a patient"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "patient_id": {"type": "string"},
                "title": {"type": "string"},
                "description": {"type": "string"},
                "priority": {"type": "integer", "minimum": 1, "maximum": 4, "default": 2,
                             "description": "1 low, 2 medium, 3 high, 4 urgent"},
                "due_date": {"type": "string", "format": "date"},
                "assigned_to": {"type": "string"}
            },
            "required": ["patient_id", "title"]
        })
    }

    async fn call(&self, arguments: Value) -> McpResult<String> {
        let args: CreateTaskArgs = parse_args(self.name(), arguments)?;
        require_text(self.name(), "patient_id", &args.patient_id)?;
        require_text(self.name(), "title", &args.title)?;

        let patient: Patient = fetch_by_id(self.store.as_ref(), tables::PATIENTS, &args.patient_id).await?;
        let priority = args.priority.unwrap_or_default();

        let row = self
            .store
            .insert(
                tables::TASKS,
                json!({
                    "patient_id": args.patient_id,
                    "title": args.title.trim(),
                    "description": args.description,
                    "status": TaskStatus::Pending,
                    "priority": priority,
                    "due_date": args.due_date,
                    "assigned_to": args.assigned_to,
                }),
            )
            .await?;
        let task: CareTask = serde_json::from_value(row)?;

        let summary = format!(
            "Created {} priority task \"{}\" for {}",
            task.priority, task.title, patient.name
        );
        dual_format(&summary, &task)
    }
}

pub struct UpdateTaskStatus {
    store: Arc<dyn Datastore>,
}

impl UpdateTaskStatus {
    pub fn new(store: Arc<dyn Datastore>) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct UpdateStatusArgs {
    task_id: String,
    status: TaskStatus,
}

#[async_trait]
impl McpTool for UpdateTaskStatus {
    fn name(&self) -> &str {
        "update_task_status"
    }

    fn description(&self) -> &str {
        "Change the status of a care task"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "task_id": {"type": "string"},
                "status": {"type": "string", "enum": ["pending", "inProgress", "completed", "cancelled"]}
            },
            "required": ["task_id", "status"]
        })
    }

    async fn call(&self, arguments: Value) -> McpResult<String> {
        let args: UpdateStatusArgs = parse_args(self.name(), arguments)?;
        require_text(self.name(), "task_id", &args.task_id)?;

        let row = self
            .store
            .update(tables::TASKS, &args.task_id, json!({ "status": args.status }))
            .await?;
        let task: CareTask = serde_json::from_value(row)?;

        dual_format(&format!("Task \"{}\" is now {}", task.title, task.status), &task)
    }
}
