//! Common error handling utilities for the HospiceCare engine
//!
//! Every crate in the workspace keeps its own `thiserror` enum close to the
//! code that raises it. This crate provides the pieces they share:
//!
//! - **Error categories**: the failure taxonomy used to decide whether an
//!   error degrades, surfaces to a caller, or stops the process
//! - **Error codes**: JSON-RPC codes returned by the dispatch server
//! - **Logging**: one structured `tracing` event shape for categorized errors
//!
//! # Error Categories
//!
//! - **UpstreamService**: transcription or completion service unreachable, timed out, or non-2xx
//! - **MalformedResponse**: a valid response whose body is not the expected shape
//! - **Datastore**: a query or write against the persistent datastore failed
//! - **Configuration**: required connection parameters are missing or invalid
//! - **UnknownOperation**: an unrecognized tool, resource, prompt, or method name
//! - **InvalidInput**: caller-supplied arguments failed validation
//!
//! # Example
//!
//! ```rust
//! use error_common::{Categorized, ErrorCategory};
//!
//! #[derive(Debug)]
//! struct MissingUrl;
//!
//! impl std::fmt::Display for MissingUrl {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str("SUPABASE_URL is not set")
//!     }
//! }
//!
//! impl Categorized for MissingUrl {
//!     fn category(&self) -> ErrorCategory {
//!         ErrorCategory::Configuration
//!     }
//! }
//!
//! assert!(MissingUrl.category().is_fatal());
//! error_common::log_error("startup", &MissingUrl);
//! ```

pub mod codes;
pub mod types;

pub use codes::*;
pub use types::*;
