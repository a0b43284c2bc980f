//! Server-Sent-Events wire encoding
//!
//! The one place that knows the transport shape. Any other transport
//! (WebSocket frames, JSON-lines) substitutes a different formatter against
//! the same [`ClassifiedEvent`] contract.

use serde_json::{Map, Value};

use crate::stream::event::ClassifiedEvent;

/// Serialize an event as `data: {"token": ..., "type": ..., ...metadata}\n\n`.
/// The literal framing is a compatibility requirement for existing clients
/// and must not change.
pub fn format_sse_event(event: &ClassifiedEvent) -> String {
    let mut data = Map::new();
    data.insert("token".to_string(), Value::String(event.content.clone()));
    data.insert("type".to_string(), Value::String(event.kind.wire_name().to_string()));
    for (key, value) in &event.metadata {
        data.insert(key.clone(), value.clone());
    }
    format!("data: {}\n\n", Value::Object(data))
}
