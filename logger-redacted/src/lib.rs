//! Logging for services that handle PHI
//!
//! Installs the process-wide `tracing` subscriber and exposes a redactor for
//! free text (visit transcripts, note sections) that must never reach a log
//! line verbatim.
//!
//! All output goes to **stderr**: the dispatch server speaks JSON-RPC on
//! stdout, so a single stray log line there would corrupt the protocol
//! stream.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: `family@example.com` → `EMAIL[hash]` / `***@***`
//! - **Phone Numbers**: `(555) 123-4567` → `PHONE[hash]` / `(***) ***-****`
//! - **SSN**: `123-45-6789` → `SSN[hash]` / `***-**-****`
//! - **Medical Record Numbers**: `MRN 00123456` → `MRN[hash]` / `MRN******`
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_logging, redact_preview, LoggerConfig};
//!
//! init_logging(&LoggerConfig::from_env(), "hospice-mcp-server")?;
//!
//! let transcript = "Spoke with daughter at (555) 123-4567 about comfort care.";
//! tracing::info!(transcript = %redact_preview(transcript, 80), "Transcript received");
//! # Ok::<(), logger_redacted::LoggerError>(())
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global subscriber. `RUST_LOG` wins over `config.log_level` when set.
pub fn init_logging(config: &LoggerConfig, service_name: &str) -> Result<(), LoggerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| LoggerError::InvalidFilter {
            directive: config.log_level.clone(),
            message: e.to_string(),
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                service_name.to_string(),
                std::io::stderr,
            ))
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
    };

    installed.map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}
