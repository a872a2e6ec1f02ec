//! Model Context Protocol (MCP) server for hospice point-of-care data
//!
//! Exposes the datastore and the note pipeline to AI agents over
//! line-delimited JSON-RPC 2.0 on stdin/stdout.
//!
//! # Capabilities
//!
//! - **Tools**: patient lookup and search, open task summary, task creation
//!   and status changes, visit history, visit note creation, clinical entity
//!   extraction, SOAP note validation
//! - **Resources**: active patients, pending tasks, recent visits (live
//!   queries) and a fixed palliative-care guideline document
//! - **Prompts**: SOAP note review, care plan summary, ESAS symptom
//!   assessment, family communication
//!
//! Tool failures are reported as `isError` results and never end the serving
//! loop. Logs go to stderr; stdout carries only protocol messages.
//!
//! # Example
//!
//! ```bash
//! SUPABASE_URL=https://xyz.supabase.co SUPABASE_SERVICE_KEY=... hospice-mcp-server
//! {"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"get_pending_tasks_summary","arguments":{"limit":5}}}
//! ```

pub mod config;
pub mod error;
pub mod prompts;
pub mod protocol;
pub mod render;
pub mod resources;
pub mod server;
pub mod tools;
pub mod transport;

pub use config::*;
pub use error::{McpError, McpResult};
pub use protocol::*;
pub use server::*;
pub use tools::{McpTool, ToolContext, ToolRegistry};
pub use transport::*;
