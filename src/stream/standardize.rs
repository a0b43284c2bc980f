//! Response standardization for the non-streaming call path
//!
//! Provider completions arrive in unpredictable shapes. Everything is
//! coerced into one fixed record so downstream code never probes fields
//! that may not exist. Malformed input degrades into a failure record
//! rather than an error; this path must never raise.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed-shape record produced for every raw provider response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardResponse {
    pub response: String,
    pub success: bool,
    pub provider: String,
    pub model: String,
    pub rate_limited: bool,
    pub error: Option<String>,
}

impl Default for StandardResponse {
    fn default() -> Self {
        Self {
            response: String::new(),
            success: true,
            provider: "unknown".to_string(),
            model: "unknown".to_string(),
            rate_limited: false,
            error: None,
        }
    }
}

/// Structural shape of the raw input, decided before any field access
enum RawShape<'a> {
    Record(&'a serde_json::Map<String, Value>),
    Malformed(&'a Value),
}

fn classify_shape(raw: &Value) -> RawShape<'_> {
    match raw.as_object() {
        Some(map) => RawShape::Record(map),
        None => RawShape::Malformed(raw),
    }
}

fn field_string(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(v) => v.to_string(),
    }
}

/// Coerce a raw provider response into a [`StandardResponse`].
pub fn standardize_response(raw: &Value) -> StandardResponse {
    match classify_shape(raw) {
        RawShape::Record(map) => {
            let success = map.get("success").and_then(Value::as_bool).unwrap_or(true);
            let mut standardized = StandardResponse {
                response: field_string(map.get("response"), ""),
                success,
                provider: field_string(map.get("provider"), "unknown"),
                model: field_string(map.get("model"), "unknown"),
                rate_limited: map.get("rate_limited").and_then(Value::as_bool).unwrap_or(false),
                error: None,
            };
            if !standardized.success || map.contains_key("error") {
                standardized.error = Some(field_string(map.get("error"), "Unknown error occurred"));
            }
            standardized
        }
        RawShape::Malformed(value) => {
            let response = match value {
                Value::Null => "Empty response".to_string(),
                Value::String(s) if s.is_empty() => "Empty response".to_string(),
                Value::String(s) => s.clone(),
                Value::Array(items) if items.is_empty() => "Empty response".to_string(),
                v => v.to_string(),
            };
            StandardResponse {
                response,
                success: false,
                error: Some("Invalid response format".to_string()),
                ..StandardResponse::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_minimal_record() {
        let standardized = standardize_response(&json!({"response": "hi"}));
        assert_eq!(standardized.response, "hi");
        assert!(standardized.success);
        assert_eq!(standardized.provider, "unknown");
        assert_eq!(standardized.model, "unknown");
        assert!(!standardized.rate_limited);
        assert_eq!(standardized.error, None);
    }

    #[test]
    fn test_full_record_passthrough() {
        let standardized = standardize_response(&json!({
            "response": "Visit in May.",
            "success": true,
            "provider": "gemini",
            "model": "gemini-1.5-flash",
            "rate_limited": false
        }));
        assert_eq!(standardized.response, "Visit in May.");
        assert_eq!(standardized.provider, "gemini");
        assert_eq!(standardized.model, "gemini-1.5-flash");
        assert_eq!(standardized.error, None);
    }

    #[test]
    fn test_failure_record_gets_default_error() {
        let standardized = standardize_response(&json!({"response": "", "success": false}));
        assert!(!standardized.success);
        assert_eq!(standardized.error.as_deref(), Some("Unknown error occurred"));
    }

    #[test]
    fn test_explicit_error_field() {
        let standardized = standardize_response(&json!({
            "success": false,
            "error": "quota exceeded"
        }));
        assert_eq!(standardized.error.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_error_key_with_successful_record() {
        // An error key forces the error field even when success is true
        let standardized = standardize_response(&json!({
            "response": "partial",
            "error": "truncated output"
        }));
        assert!(standardized.success);
        assert_eq!(standardized.error.as_deref(), Some("truncated output"));
    }

    #[test]
    fn test_rate_limited_flag() {
        let standardized = standardize_response(&json!({
            "response": "",
            "rate_limited": true
        }));
        assert!(standardized.rate_limited);
    }

    #[test]
    fn test_string_input_is_malformed() {
        let standardized = standardize_response(&json!("just a string"));
        assert!(!standardized.success);
        assert_eq!(standardized.error.as_deref(), Some("Invalid response format"));
        assert_eq!(standardized.response, "just a string");
    }

    #[test]
    fn test_null_input() {
        let standardized = standardize_response(&Value::Null);
        assert!(!standardized.success);
        assert_eq!(standardized.response, "Empty response");
    }

    #[test]
    fn test_empty_string_input() {
        let standardized = standardize_response(&json!(""));
        assert_eq!(standardized.response, "Empty response");
        assert!(!standardized.success);
    }

    #[test]
    fn test_numeric_input_stringified() {
        let standardized = standardize_response(&json!(42));
        assert_eq!(standardized.response, "42");
        assert!(!standardized.success);
    }

    #[test]
    fn test_non_string_response_field_stringified() {
        let standardized = standardize_response(&json!({"response": 42}));
        assert_eq!(standardized.response, "42");
        assert!(standardized.success);
    }

    #[test]
    fn test_serialization_round_trip() {
        let standardized = standardize_response(&json!({"response": "hi", "provider": "groq"}));
        let json_text = serde_json::to_string(&standardized).unwrap();
        let back: StandardResponse = serde_json::from_str(&json_text).unwrap();
        assert_eq!(back, standardized);
    }
}
