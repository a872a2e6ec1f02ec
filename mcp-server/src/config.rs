//! Command-line and environment configuration for the server binary
use clap::Parser;
use clinical_notes::CompletionConfig;
use database_layer::{DatabaseError, DatastoreConfig};
use error_common::{Categorized, ErrorCategory};
use logger_redacted::{LogFormat, LoggerConfig};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error(transparent)]
    Datastore(#[from] DatabaseError),
}

impl Categorized for ConfigError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Hospice MCP server: patients, tasks, visits and note synthesis over stdio
#[derive(Parser, Debug, Clone)]
#[command(name = "hospice-mcp-server", version)]
#[command(about = "Model Context Protocol server for hospice point-of-care data")]
pub struct Cli {
    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase service role key
    #[arg(long, env = "SUPABASE_SERVICE_KEY", hide_env_values = true)]
    pub supabase_service_key: Option<String>,

    /// API key for the completion service; without it notes use keyword extraction
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Completion model name
    #[arg(long, env = "COMPLETION_MODEL", default_value = "gpt-4o-mini")]
    pub completion_model: String,

    /// Log filter directive (RUST_LOG takes precedence)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format: pretty or json
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Validated server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub datastore: DatastoreConfig,
    pub completion: CompletionConfig,
}

impl Cli {
    /// Logging settings are usable before the rest is validated
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig::default()
            .with_level(self.log_level.clone())
            .with_format(LogFormat::parse(&self.log_format).unwrap_or_default())
    }

    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let datastore = DatastoreConfig::from_parts(self.supabase_url, self.supabase_service_key)?;
        let completion = CompletionConfig {
            base_url: self.openai_base_url,
            api_key: self.openai_api_key.filter(|key| !key.trim().is_empty()),
            model: self.completion_model,
            ..CompletionConfig::default()
        };
        if completion.model.trim().is_empty() {
            return Err(ConfigError::Missing("COMPLETION_MODEL"));
        }

        Ok(ServerConfig {
            datastore,
            completion,
        })
    }
}
