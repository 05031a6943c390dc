//! EA-Bridge - stdio tool server for a personal assistant bridge
//!
//! A newline-delimited JSON-RPC 2.0 (MCP-style) server exposing five
//! tools to an assistant client:
//! - **route**: keyword-based auto-routing of operations to downstream
//!   agents (simulated; nothing is executed)
//! - **memory**: volatile in-process key/value store
//! - **calendarCheck**: fixed calendar list (stub, no backend)
//! - **taskADHD**: pure task heuristics (chunking, prioritization,
//!   time-blocking, energy matching)
//! - **family**: static family member profiles
//!
//! # Architecture
//!
//! The transport loop reads one line at a time from stdin and writes at
//! most one response line per request to stdout; all diagnostics go to
//! stderr via `tracing`. Below the transport everything is synchronous
//! and in-memory: there is no network, no disk, and no state that
//! survives the process.

pub mod agents;
pub mod config;
pub mod error;
pub mod family;
pub mod heuristics;
pub mod mcp;
pub mod store;

// Re-export commonly used types
pub use agents::AgentRegistry;
pub use config::ServerConfig;
pub use error::{BridgeError, Result};
pub use mcp::{McpServer, ToolHandler};
pub use store::StateStore;
