//! Error types for Wayfarer
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Wayfarer
#[derive(Debug, Error)]
pub enum WayfarerError {
    /// LLM source failure (stream or completion)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Tool execution error
    #[error("Tool error: {0}")]
    Tool(String),

    /// Unknown tool requested
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Session history error
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration problem
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Wayfarer operations
pub type Result<T> = std::result::Result<T, WayfarerError>;
