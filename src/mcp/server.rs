//! MCP server: protocol engine and stdio transport
//!
//! Newline-delimited JSON-RPC 2.0 over stdin/stdout. Each input line
//! yields at most one output line: exactly one for a request, none for a
//! notification. Diagnostics go through `tracing` (stderr) and are never
//! interleaved with the response stream.

use super::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, Method, ToolCallParams, ToolOutcome,
    KNOWN_NOTIFICATIONS,
};
use super::tools::ToolHandler;
use crate::config::ServerConfig;
use crate::error::Result;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

/// MCP protocol version this server reports.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC server over stdio
pub struct McpServer {
    config: ServerConfig,
    tool_handler: ToolHandler,
    /// Diagnostics only; no method is rejected before `initialize`.
    initialized: bool,
}

impl McpServer {
    pub fn new(config: ServerConfig, tool_handler: ToolHandler) -> Self {
        Self {
            config,
            tool_handler,
            initialized: false,
        }
    }

    /// Run the transport loop until stdin closes.
    pub async fn run(&mut self) -> Result<()> {
        info!("EA-Bridge MCP server started, listening on stdin...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    debug!("Received EOF, shutting down");
                    break;
                }
                Ok(_) => {
                    let raw = line.trim();
                    if raw.is_empty() {
                        continue;
                    }

                    let Some(response) = self.handle_line(raw) else {
                        continue;
                    };

                    let response_json =
                        serde_json::to_string(&response).unwrap_or_else(|e| {
                            error!("Failed to serialize response: {}", e);
                            serde_json::to_string(&JsonRpcResponse::error(
                                None,
                                JsonRpcError::internal_error(format!(
                                    "Serialization error: {e}"
                                )),
                            ))
                            .unwrap()
                        });

                    if let Err(e) = stdout.write_all(response_json.as_bytes()).await {
                        error!("Failed to write response: {}", e);
                        break;
                    }
                    if let Err(e) = stdout.write_all(b"\n").await {
                        error!("Failed to write newline: {}", e);
                        break;
                    }
                    if let Err(e) = stdout.flush().await {
                        error!("Failed to flush stdout: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        info!("EA-Bridge MCP server shut down");
        Ok(())
    }

    /// Process one input line. Returns `None` for notifications; every
    /// other line (including unparseable ones) gets exactly one response.
    pub fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Parse error: {e}")),
                ));
            }
        };

        // Absence of an id alone makes a message a notification; the
        // method name plays no part in that decision.
        if request.is_notification() {
            if KNOWN_NOTIFICATIONS.contains(&request.method.as_str()) {
                debug!("Notification: {}", request.method);
            } else {
                debug!("Ignoring unrecognized notification: {}", request.method);
            }
            return None;
        }

        Some(self.dispatch(request))
    }

    fn dispatch(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let Some(method) = Method::from_name(&request.method) else {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::method_not_found(&request.method),
            );
        };

        let id = request.id.clone();
        match self.handle_method(method, request.params) {
            Ok(result) => JsonRpcResponse::success(id, result),
            // Handler failure for a known method: internal error carrying
            // the message, never a backtrace.
            Err(e) => JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string())),
        }
    }

    fn handle_method(&mut self, method: Method, params: Value) -> Result<Value> {
        match method {
            Method::Initialize => Ok(self.handle_initialize()),
            Method::ToolsList => {
                debug!("Handling tools/list");
                Ok(serde_json::json!({
                    "tools": self.tool_handler.list_tools(),
                }))
            }
            Method::ToolsCall => Ok(self.handle_tools_call(params).into_result_value()),
            Method::PromptsList => Ok(serde_json::json!({ "prompts": [] })),
            Method::ResourcesList => Ok(serde_json::json!({ "resources": [] })),
        }
    }

    fn handle_initialize(&mut self) -> Value {
        debug!("Handling initialize");
        self.initialized = true;

        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": self.config.server_name,
                "version": self.config.server_version,
            },
            "capabilities": {
                "tools": {},
                "prompts": {},
                "resources": {},
            }
        })
    }

    /// Tool failures never surface as JSON-RPC errors: every `tools/call`
    /// request answers with a successful envelope, and a failed tool only
    /// differs in carrying error text as its content.
    fn handle_tools_call(&mut self, params: Value) -> ToolOutcome {
        debug!("Handling tools/call");
        if !self.initialized {
            debug!("tools/call before initialize (allowed)");
        }

        let call: ToolCallParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => return ToolOutcome::Failure(format!("Invalid arguments: {e}")),
        };

        match self.tool_handler.execute(&call.name, call.arguments) {
            Ok(value) => ToolOutcome::Success(value),
            Err(e) => {
                warn!("Tool '{}' failed: {}", call.name, e);
                ToolOutcome::Failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentRegistry;
    use crate::store::StateStore;
    use serde_json::json;

    fn test_server() -> McpServer {
        let config = ServerConfig::default();
        let handler = ToolHandler::new(config.clone(), AgentRegistry::new(), StateStore::new());
        McpServer::new(config, handler)
    }

    #[test]
    fn test_parse_error_has_null_id() {
        let mut server = test_server();
        let response = server.handle_line("{not json").unwrap();
        assert!(response.id.is_none());
        assert_eq!(response.error.unwrap().code, -32700);
    }

    #[test]
    fn test_unknown_method_echoes_id() {
        let mut server = test_server();
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"tools/delete","id":7}"#)
            .unwrap();
        assert_eq!(response.id, Some(json!(7)));
        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found: tools/delete");
    }

    #[test]
    fn test_notification_produces_no_response() {
        let mut server = test_server();
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .is_none());
        // Even an unknown method stays silent without an id.
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"tools/delete"}"#)
            .is_none());
    }

    #[test]
    fn test_null_id_request_is_answered_with_null_id() {
        let mut server = test_server();
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"tools/list","id":null}"#)
            .expect("a present null id is a request, not a notification");
        assert_eq!(response.id, Some(Value::Null));
        assert!(response.result.is_some());
    }

    #[test]
    fn test_initialize_reports_identity() {
        let mut server = test_server();
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"initialize","id":1}"#)
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], json!(PROTOCOL_VERSION));
        assert_eq!(result["serverInfo"]["name"], json!("ea-bridge"));
        assert!(server.initialized);
    }

    #[test]
    fn test_tools_list_snapshot() {
        let mut server = test_server();
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"tools/list","id":2}"#)
            .unwrap();
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 5);
    }

    #[test]
    fn test_prompts_and_resources_are_empty() {
        let mut server = test_server();
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"prompts/list","id":3}"#)
            .unwrap();
        assert_eq!(response.result.unwrap()["prompts"], json!([]));

        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"resources/list","id":4}"#)
            .unwrap();
        assert_eq!(response.result.unwrap()["resources"], json!([]));
    }

    #[test]
    fn test_unknown_tool_is_a_successful_error_result() {
        let mut server = test_server();
        let response = server
            .handle_line(
                r#"{"jsonrpc":"2.0","method":"tools/call","id":5,"params":{"name":"nope","arguments":{}}}"#,
            )
            .unwrap();
        assert!(response.error.is_none());
        let text = response.result.unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(text, "Error: Unknown tool: nope");
    }
}
