use error_common::{Categorized, ErrorCategory};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Datastore configuration error: {0}")]
    Configuration(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query on '{table}' failed: {message}")]
    QueryFailed { table: String, message: String },

    #[error("No row in '{table}' with id {id}")]
    NotFound { table: String, id: String },

    #[error("Row decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl DatabaseError {
    pub(crate) fn query_failed(table: &str, message: impl Into<String>) -> Self {
        Self::QueryFailed {
            table: table.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(table: &str, id: &str) -> Self {
        Self::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }
    }
}

impl Categorized for DatabaseError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Datastore,
        }
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
