//! Model Context Protocol (MCP) server implementation
//!
//! JSON-RPC 2.0 over stdio: protocol envelope types, the method/tool
//! dispatchers, and the transport loop.

pub mod protocol;
pub mod server;
pub mod tools;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Method, ToolOutcome};
pub use server::McpServer;
pub use tools::{Tool, ToolHandler};
