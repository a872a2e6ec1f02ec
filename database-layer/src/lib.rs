//! Datastore abstraction for the HospiceCare engine
//!
//! The pipeline and the dispatch server only ever need a handful of
//! primitives: select rows from a table (filtered by equality or inclusion,
//! ordered by one column, limited, optionally embedding columns of a related
//! table through a foreign key) and insert/update/delete a row. No query
//! language leaks past this crate.
//!
//! # Backends
//!
//! - [`RestDatastore`]: PostgREST over HTTP (Supabase projects)
//! - [`InMemoryDatastore`]: tables held in process, same query semantics
//!
//! # Example
//!
//! ```rust,no_run
//! use database_layer::{fetch_all, CareTask, DatastoreConfig, Direction, Query, RestDatastore};
//!
//! # async fn example() -> Result<(), database_layer::DatabaseError> {
//! let store = RestDatastore::connect(&DatastoreConfig::from_env()?)?;
//!
//! let query = Query::table("tasks")
//!     .in_list("status", ["pending", "inProgress"])
//!     .order_by("priority", Direction::Descending)
//!     .limit(10)
//!     .embed("patients", "patient_id", &["name"]);
//!
//! let tasks: Vec<CareTask> = fetch_all(&store, &query).await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod memory;
pub mod models;
pub mod query;

pub use connection::*;
pub use error::*;
pub use memory::*;
pub use models::*;
pub use query::*;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Generic row access. Each call is an independent remote operation; no
/// transaction or locking discipline is imposed beyond the backend's own.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Rows matching `query`, as JSON objects
    async fn select(&self, query: &Query) -> DatabaseResult<Vec<JsonValue>>;

    /// Insert one row and return it as stored (with generated columns)
    async fn insert(&self, table: &str, row: JsonValue) -> DatabaseResult<JsonValue>;

    /// Merge `patch` into the row with primary key `id` and return the result
    async fn update(&self, table: &str, id: &str, patch: JsonValue) -> DatabaseResult<JsonValue>;

    async fn delete(&self, table: &str, id: &str) -> DatabaseResult<()>;
}
