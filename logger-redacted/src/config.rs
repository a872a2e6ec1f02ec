// Logger configuration
use serde::{Deserialize, Serialize};

/// Output format of log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable single-line events
    #[default]
    Pretty,
    /// Bunyan-style JSON, one object per line
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pretty" | "text" | "plain" => Some(Self::Pretty),
            "json" | "bunyan" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// `EnvFilter` directive, e.g. `info` or `mcp_server=debug,info`
    pub log_level: String,
    pub format: LogFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggerConfig {
    /// Load from `LOG_LEVEL` and `LOG_FORMAT`, keeping defaults for anything unset
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let log_level = std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level);
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| LogFormat::parse(&s))
            .unwrap_or(defaults.format);

        Self { log_level, format }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}
