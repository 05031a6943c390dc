//! JSON-RPC 2.0 protocol types
//!
//! Envelope structs for the stdio transport plus the closed set of
//! methods this server answers. A message without an `id` is a
//! notification and never produces a response; that rule does not depend
//! on the method name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 request or notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,

    /// Method name to invoke
    pub method: String,

    /// Parameters (object, array, or absent)
    #[serde(default)]
    pub params: Value,

    /// Correlation id; `None` only when the field was absent. An
    /// explicit `"id": null` deserializes to `Some(Value::Null)` and is
    /// answered with a null id.
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
}

/// Keeps a present-but-null id distinguishable from an absent one: the
/// field default handles absence, so any present value (null included)
/// becomes `Some`.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    /// A message without an id is a notification and gets no response.
    /// Presence of the id field decides, not its value: `"id": null` is
    /// still a request.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,

    /// Echoed request id; null when the request was unparseable
    pub id: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Parse error (-32700)
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: -32700,
            message: message.into(),
            data: None,
        }
    }

    /// Method not found (-32601)
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    /// Internal error (-32603)
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            code: -32603,
            message: message.into(),
            data: None,
        }
    }
}

/// Closed set of methods this server answers. Anything outside it falls
/// through to the single -32601 branch in the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    PromptsList,
    ResourcesList,
}

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "initialize" => Some(Self::Initialize),
            "tools/list" => Some(Self::ToolsList),
            "tools/call" => Some(Self::ToolsCall),
            "prompts/list" => Some(Self::PromptsList),
            "resources/list" => Some(Self::ResourcesList),
            _ => None,
        }
    }
}

/// Notification method names the server recognizes for diagnostics.
/// Unlisted notification methods are dropped just the same.
pub const KNOWN_NOTIFICATIONS: &[&str] =
    &["notifications/initialized", "notifications/cancelled"];

/// Typed params for `tools/call`
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Outcome of a tool invocation. Both variants serialize into a
/// *successful* `tools/call` result; a failure only differs in carrying
/// error text instead of the tool's value. Callers of the library match
/// on the variant instead of sniffing the text prefix.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Failure(String),
}

impl ToolOutcome {
    /// Render as the uniform content-block envelope: one text block,
    /// pretty-printed JSON on success, `"Error: {message}"` on failure.
    pub fn into_result_value(self) -> Value {
        let text = match self {
            ToolOutcome::Success(value) => serde_json::to_string_pretty(&value)
                .unwrap_or_else(|_| value.to_string()),
            ToolOutcome::Failure(message) => format!("Error: {message}"),
        };
        serde_json::json!({
            "content": [
                {
                    "type": "text",
                    "text": text,
                }
            ]
        })
    }
}
