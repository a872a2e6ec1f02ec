//! MCP tools: trait, registry and the hospice tool set
pub mod notes;
pub mod patients;
pub mod tasks;
pub mod visits;

use crate::error::{McpError, McpResult};
use crate::protocol::{ToolCallResult, ToolCatalogEntry};
use async_trait::async_trait;
use clinical_notes::{EntityExtractor, NoteSynthesizer};
use database_layer::Datastore;
use error_common::log_error;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Trait for MCP tool implementations
#[async_trait]
pub trait McpTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Input schema (JSON Schema)
    fn input_schema(&self) -> Value;

    /// Execute the tool and return the rendered reply text
    async fn call(&self, arguments: Value) -> McpResult<String>;
}

/// Services shared by every tool
#[derive(Clone)]
pub struct ToolContext {
    pub store: Arc<dyn Datastore>,
    pub synthesizer: NoteSynthesizer,
    pub extractor: EntityExtractor,
}

/// Decode tool arguments, naming the tool on failure
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> McpResult<T> {
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| McpError::InvalidParams(format!("{tool}: {e}")))
}

/// Reject blank required strings
pub(crate) fn require_text(tool: &str, field: &str, value: &str) -> McpResult<()> {
    if value.trim().is_empty() {
        return Err(McpError::InvalidParams(format!("{tool}: {field} must not be empty")));
    }
    Ok(())
}

/// Apply a default and clamp into 1..=max
pub(crate) fn bounded_limit(requested: Option<usize>, default: usize, max: usize) -> usize {
    requested.unwrap_or(default).clamp(1, max)
}

/// Tools keyed by name, listed in registration order
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn McpTool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registry holding the full hospice tool set
    pub fn with_default_tools(context: &ToolContext) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(patients::GetPatientInfo::new(context.store.clone())));
        registry.register(Arc::new(patients::SearchPatients::new(context.store.clone())));
        registry.register(Arc::new(tasks::GetPendingTasksSummary::new(context.store.clone())));
        registry.register(Arc::new(tasks::CreateTask::new(context.store.clone())));
        registry.register(Arc::new(tasks::UpdateTaskStatus::new(context.store.clone())));
        registry.register(Arc::new(visits::GetPatientVisits::new(context.store.clone())));
        registry.register(Arc::new(visits::CreateVisitNote::new(
            context.store.clone(),
            context.synthesizer.clone(),
        )));
        registry.register(Arc::new(notes::ExtractClinicalEntities::new(context.extractor.clone())));
        registry.register(Arc::new(notes::ValidateClinicalNote));
        registry
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn McpTool>) {
        let name = tool.name().to_string();
        debug!(tool = %name, "Registering tool");
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn list(&self) -> Vec<ToolCatalogEntry> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolCatalogEntry {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Execute a tool by name. Failures become `isError` results, never protocol errors.
    pub async fn call(&self, name: &str, arguments: Value) -> ToolCallResult {
        let Some(tool) = self.tools.get(name) else {
            let err = McpError::UnknownTool(name.to_string());
            log_error("tools/call", &err);
            return ToolCallResult::error(err.to_string());
        };

        match tool.call(arguments).await {
            Ok(text) => {
                info!(tool = name, "Tool executed");
                ToolCallResult::text(text)
            }
            Err(err) => {
                log_error(name, &err);
                ToolCallResult::error(format!("Error executing tool '{name}': {err}"))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
