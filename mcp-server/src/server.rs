//! MCP Server implementation
use crate::error::{McpError, McpResult};
use crate::prompts::PromptCatalog;
use crate::protocol::{
    methods, JsonRpcRequest, JsonRpcResponse, PromptGetParams, ResourceReadParams, ToolCallParams,
    JSONRPC_VERSION, PROTOCOL_VERSION,
};
use crate::resources::ResourceCatalog;
use crate::tools::{ToolContext, ToolRegistry};
use crate::transport::Transport;
use error_common::codes::rpc;
use error_common::log_error;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "hospice-mcp-server";

/// Dispatch server holding catalogs built once at startup
pub struct McpServer {
    tools: ToolRegistry,
    resources: ResourceCatalog,
    prompts: PromptCatalog,
}

fn parse_params<T: DeserializeOwned>(method: &str, params: Value) -> McpResult<T> {
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(format!("{method}: {e}")))
}

impl McpServer {
    pub fn new(context: ToolContext) -> Self {
        let tools = ToolRegistry::with_default_tools(&context);
        info!(tools = tools.len(), "Initializing MCP Server");
        Self {
            resources: ResourceCatalog::new(context.store.clone()),
            prompts: PromptCatalog::new(),
            tools,
        }
    }

    /// Handle one raw inbound line. Returns the serialized reply, or `None`
    /// for notifications and blank lines.
    pub async fn handle_message(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(JsonRpcResponse::failure(
                Value::Null,
                rpc::PARSE_ERROR,
                format!("Parse error: {e}"),
            )),
            Ok(raw) => {
                let id = raw.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<JsonRpcRequest>(raw) {
                    Ok(request) => self.handle_request(request).await,
                    Err(e) => Some(JsonRpcResponse::failure(
                        id,
                        rpc::INVALID_REQUEST,
                        format!("Invalid request: {e}"),
                    )),
                }
            }
        }?;

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Failed to serialize response: {}", e);
                Some(format!(
                    r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"Internal error"}}}}"#,
                    rpc::INTERNAL_ERROR
                ))
            }
        }
    }

    /// Handle a decoded request; notifications get no response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "Handling MCP request");

        if let Some(version) = request.jsonrpc.as_deref().filter(|v| *v != JSONRPC_VERSION) {
            return request.id.map(|id| {
                JsonRpcResponse::failure(id, rpc::INVALID_REQUEST, format!("Unsupported jsonrpc version: {version}"))
            });
        }

        let is_notification = request.is_notification();
        let method = request.method.clone();
        let outcome = self.dispatch(request.method.as_str(), request.params).await;

        if is_notification {
            if let Err(err) = outcome {
                log_error(&method, &err);
            }
            return None;
        }

        let id = request.id.unwrap_or(Value::Null);
        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => {
                log_error(&method, &err);
                JsonRpcResponse::failure(id, err.rpc_code(), err.to_string())
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Value) -> McpResult<Value> {
        match method {
            methods::INITIALIZE => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                },
                "capabilities": {
                    "tools": {},
                    "resources": {},
                    "prompts": {}
                }
            })),
            methods::INITIALIZED => {
                info!("Client initialized");
                Ok(Value::Null)
            }
            methods::PING => Ok(json!({})),
            methods::LIST_TOOLS => Ok(json!({ "tools": self.tools.list() })),
            methods::CALL_TOOL => {
                let call: ToolCallParams = parse_params(method, params)?;
                let result = self.tools.call(&call.name, call.arguments).await;
                Ok(serde_json::to_value(result)?)
            }
            methods::LIST_RESOURCES => Ok(json!({ "resources": self.resources.list() })),
            methods::READ_RESOURCE => {
                let read: ResourceReadParams = parse_params(method, params)?;
                let contents = self.resources.read(&read.uri).await?;
                Ok(json!({ "contents": [contents] }))
            }
            methods::LIST_PROMPTS => Ok(json!({ "prompts": self.prompts.list() })),
            methods::GET_PROMPT => {
                let get: PromptGetParams = parse_params(method, params)?;
                Ok(serde_json::to_value(self.prompts.get(&get.name, &get.arguments)?)?)
            }
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    /// Serve until the peer closes the stream. Transport failures are returned.
    pub async fn serve<T: Transport>(&self, transport: &mut T) -> anyhow::Result<()> {
        info!("MCP server ready");
        while let Some(line) = transport.read_message().await? {
            if let Some(reply) = self.handle_message(&line).await {
                transport.write_message(&reply).await?;
            }
        }
        info!("Transport closed, shutting down");
        Ok(())
    }
}
