// Error codes returned across the dispatch server's JSON-RPC boundary

use crate::types::ErrorCategory;

pub mod rpc {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const RESOURCE_NOT_FOUND: i32 = -32002;
}

/// JSON-RPC code for an error of the given category
pub fn rpc_code(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::UnknownOperation | ErrorCategory::InvalidInput => rpc::INVALID_PARAMS,
        ErrorCategory::UpstreamService
        | ErrorCategory::MalformedResponse
        | ErrorCategory::Datastore
        | ErrorCategory::Configuration => rpc::INTERNAL_ERROR,
    }
}
