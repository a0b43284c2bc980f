//! Classified stream events
//!
//! The classifier turns raw model fragments into a normalized event stream.
//! Each event carries the cleaned text chunk, its semantic category, and a
//! small metadata bag that rides along to the transport layer untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Semantic category of a classified chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Model entered a hidden reasoning section
    ThinkingStart,
    /// Reasoning text (hidden from the final answer)
    Thinking,
    /// Model left the reasoning section
    ThinkingEnd,
    /// Tool invocation detected in reasoning text
    ToolCallStart,
    /// The formatted tool-call record
    ToolCall,
    /// Tool invocation record complete
    ToolCallEnd,
    /// Tool execution beginning
    ToolResultStart,
    /// Output of an executed tool
    ToolResult,
    /// Tool execution finished
    ToolResultEnd,
    /// User-visible answer text
    Response,
    /// Stream-level failure
    Error,
    /// Terminal event, exactly one per stream
    Complete,
}

impl EventKind {
    /// Wire name used in the `type` field (e.g. "thinking_start")
    pub fn wire_name(&self) -> &'static str {
        match self {
            EventKind::ThinkingStart => "thinking_start",
            EventKind::Thinking => "thinking",
            EventKind::ThinkingEnd => "thinking_end",
            EventKind::ToolCallStart => "tool_call_start",
            EventKind::ToolCall => "tool_call",
            EventKind::ToolCallEnd => "tool_call_end",
            EventKind::ToolResultStart => "tool_result_start",
            EventKind::ToolResult => "tool_result",
            EventKind::ToolResultEnd => "tool_result_end",
            EventKind::Response => "response",
            EventKind::Error => "error",
            EventKind::Complete => "complete",
        }
    }
}

/// A single classified chunk with transport metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedEvent {
    /// Cleaned text content (may be empty for control events)
    pub content: String,
    /// Semantic category
    pub kind: EventKind,
    /// Extra fields flattened into the wire payload
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ClassifiedEvent {
    /// Create an event with empty metadata
    pub fn new(kind: EventKind, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind,
            metadata: Map::new(),
        }
    }

    /// Attach a metadata field (builder style)
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Metadata field as a string slice, if present and a string
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Metadata field as an integer, if present and numeric
    pub fn meta_u64(&self, key: &str) -> Option<u64> {
        self.metadata.get(key).and_then(Value::as_u64)
    }
}
