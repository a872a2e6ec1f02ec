use database_layer::DatabaseError;
use error_common::codes::{rpc, rpc_code};
use error_common::{Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum McpError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl McpError {
    /// JSON-RPC error code reported to the caller
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::UnknownResource(_) => rpc::RESOURCE_NOT_FOUND,
            Self::MethodNotFound(_) => rpc::METHOD_NOT_FOUND,
            other => rpc_code(other.category()),
        }
    }
}

impl Categorized for McpError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownTool(_) | Self::UnknownResource(_) | Self::UnknownPrompt(_) | Self::MethodNotFound(_) => {
                ErrorCategory::UnknownOperation
            }
            Self::InvalidParams(_) => ErrorCategory::InvalidInput,
            Self::Database(inner) => inner.category(),
            Self::Serialization(_) => ErrorCategory::MalformedResponse,
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_codes() {
        assert_eq!(McpError::UnknownResource("medical://x".into()).rpc_code(), -32002);
        assert_eq!(McpError::UnknownPrompt("x".into()).rpc_code(), -32602);
        assert_eq!(McpError::InvalidParams("x".into()).rpc_code(), -32602);
        assert_eq!(McpError::MethodNotFound("x".into()).rpc_code(), -32601);
        let db = McpError::from(DatabaseError::not_found("patients", "p1"));
        assert_eq!(db.rpc_code(), -32603);
    }
}
