//! Error types for the EA-Bridge tool server
//!
//! Structured error definitions via thiserror; anyhow is used at the
//! binary boundary for context-rich startup failures.

use thiserror::Error;

/// Main error type for EA-Bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Tool name not present in the registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments did not match the expected shape
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Unrecognized action string inside a tool call
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Display timezone could not be parsed
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error on the stdio transport
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for EA-Bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

impl From<anyhow::Error> for BridgeError {
    fn from(err: anyhow::Error) -> Self {
        BridgeError::Other(err.to_string())
    }
}
