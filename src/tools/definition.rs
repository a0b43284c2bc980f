//! Tool trait and definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WayfarerError};

/// Description of a tool as advertised to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (e.g. "WeatherTool")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema for input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Schema for tools taking a single required `city` string
    pub fn city_schema() -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": { "type": "string", "description": "City name" }
            },
            "required": ["city"]
        })
    }
}

/// An executable tool. Implementations are synchronous lookups; anything
/// that needs real I/O belongs behind its own abstraction.
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;
    fn execute(&self, input: &Value) -> Result<String>;
}

/// Pull the required `city` parameter out of a tool input record
pub fn required_city(input: &Value) -> Result<String> {
    input
        .get("city")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| WayfarerError::Tool("missing required parameter: city".to_string()))
}
