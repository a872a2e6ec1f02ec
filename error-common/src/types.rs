use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure taxonomy shared by the pipeline and the dispatch server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Network, timeout, or non-2xx answer from an external service
    UpstreamService,
    /// The service answered but the body is not what was asked for
    MalformedResponse,
    /// Datastore query or write failure
    Datastore,
    /// Missing or invalid connection parameters
    Configuration,
    /// Unrecognized tool, resource, prompt, or method name
    UnknownOperation,
    /// Caller-supplied arguments are invalid
    InvalidInput,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpstreamService => "upstream_service",
            Self::MalformedResponse => "malformed_response",
            Self::Datastore => "datastore",
            Self::Configuration => "configuration",
            Self::UnknownOperation => "unknown_operation",
            Self::InvalidInput => "invalid_input",
        }
    }

    /// Only configuration failures stop the process; everything else is
    /// either absorbed by a fallback or reported back to the caller.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Configuration)
    }

    /// Failures that the note pipeline absorbs into its deterministic fallback
    pub fn triggers_fallback(self) -> bool {
        matches!(self, Self::UpstreamService | Self::MalformedResponse)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every crate-level error enum
pub trait Categorized: fmt::Display {
    fn category(&self) -> ErrorCategory;
}

/// Emit one structured error event for a categorized error
pub fn log_error<E: Categorized + ?Sized>(context: &str, error: &E) {
    let category = error.category();
    if category.is_fatal() {
        tracing::error!(context, error_category = %category, error = %error, "Fatal error");
    } else {
        tracing::warn!(context, error_category = %category, error = %error, "Operation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(ErrorCategory::Configuration.is_fatal());
        assert!(!ErrorCategory::Datastore.is_fatal());
        assert!(!ErrorCategory::UnknownOperation.is_fatal());
    }

    #[test]
    fn test_fallback_categories() {
        assert!(ErrorCategory::UpstreamService.triggers_fallback());
        assert!(ErrorCategory::MalformedResponse.triggers_fallback());
        assert!(!ErrorCategory::Datastore.triggers_fallback());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorCategory::UnknownOperation).unwrap();
        assert_eq!(json, "\"unknown_operation\"");
        assert_eq!(ErrorCategory::UnknownOperation.to_string(), "unknown_operation");
    }
}
