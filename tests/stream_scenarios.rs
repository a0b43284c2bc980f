//! End-to-end streaming scenarios
//!
//! Drives the public API the way a chat frontend would: classified events
//! from fragment streams, SSE framing, response standardization, and full
//! agent turns against offline sources.

use std::sync::Arc;

use wayfarer::agent::TripAgent;
use wayfarer::config::Config;
use wayfarer::provider::{MockTravelSource, ScriptedSource, TokenSource};
use wayfarer::stream::{EventKind, StreamClassifier, format_sse_event, standardize_response};

fn quiet_config() -> Config {
    let mut config = Config::default();
    config.streaming.terminal_logging = false;
    config
}

fn ok_stream(fragments: &[&str]) -> Vec<Result<String, std::io::Error>> {
    fragments.iter().map(|f| Ok(f.to_string())).collect()
}

/// A thinking conversation produces the canonical event sequence and a
/// clean final answer.
#[test]
fn test_thinking_conversation() {
    let mut classifier = StreamClassifier::new(false);
    let events = classifier.process_stream(ok_stream(&[
        "I will check.",
        "<thinking>",
        "Need weather for Paris. ",
        "</thinking>",
        "It's sunny in Paris.",
    ]));

    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::ThinkingStart,
            EventKind::Thinking,
            EventKind::ThinkingEnd,
            EventKind::Response,
            EventKind::Complete,
        ]
    );
    assert_eq!(classifier.extract_final_response(), "It's sunny in Paris.");
}

/// Responses without any reasoning block pass through untouched.
#[test]
fn test_direct_response() {
    let mut classifier = StreamClassifier::new(false);
    let events = classifier.process_stream(ok_stream(&["Rome has ", "great food."]));

    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Response, EventKind::Complete]);
    assert_eq!(classifier.extract_final_response(), "Rome has great food.");
}

/// Marker variants and split boundaries behave the same as the canonical
/// form arriving in one piece.
#[test]
fn test_marker_variants_and_splits() {
    let mut classifier = StreamClassifier::new(false);

    classifier.process_stream(ok_stream(&["<think>brief</think>", "short tags work"]));
    assert_eq!(classifier.thinking_text(), "brief");
    assert_eq!(classifier.extract_final_response(), "short tags work");

    classifier.process_stream(ok_stream(&["<thi", "nking>hello</thinking>world"]));
    assert_eq!(classifier.thinking_text(), "hello");
    assert_eq!(classifier.extract_final_response(), "world");
}

/// A failing source ends the event sequence with Error then Complete, and
/// no response text follows the failure.
#[test]
fn test_error_stream() {
    let mut classifier = StreamClassifier::new(false);
    let fragments = vec![
        Ok("partial ".to_string()),
        Err(std::io::Error::other("connection reset")),
        Ok("never delivered".to_string()),
    ];
    let events = classifier.process_stream(fragments);

    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Error, EventKind::Complete]);
    assert!(events[0].content.contains("connection reset"));
}

/// SSE frames carry the token, wire type name, and metadata in one JSON
/// object per event.
#[test]
fn test_sse_framing() {
    let mut classifier = StreamClassifier::new(false);
    let events = classifier.process_stream(ok_stream(&["<thinking>t</thinking>", "hi"]));

    for event in &events {
        let frame = format_sse_event(event);
        assert!(frame.starts_with("data: "));
        assert!(frame.ends_with("\n\n"));

        let json: serde_json::Value =
            serde_json::from_str(frame.trim_start_matches("data: ").trim_end()).unwrap();
        assert_eq!(json["token"], event.content);
        assert!(json["type"].is_string());
    }

    let done = format_sse_event(events.last().unwrap());
    assert!(done.contains("\"type\":\"complete\""));
    assert!(done.contains("\"had_thinking\":true"));
}

/// Non-streaming provider records standardize to one shape regardless of
/// which fields the provider bothered to set.
#[test]
fn test_standardization() {
    let full = standardize_response(&serde_json::json!({
        "response": "<thinking>x</thinking>ok",
        "success": true,
        "provider": "gemini",
        "model": "gemini-1.5-flash",
    }));
    assert!(full.success);
    assert_eq!(full.provider, "gemini");
    assert!(full.error.is_none());

    let sparse = standardize_response(&serde_json::json!({"response": "hi"}));
    assert!(sparse.success);
    assert_eq!(sparse.provider, "unknown");
    assert_eq!(sparse.model, "unknown");

    let malformed = standardize_response(&serde_json::json!(["not", "a", "record"]));
    assert!(!malformed.success);
    assert_eq!(malformed.error.as_deref(), Some("Invalid response format"));
}

/// Full agent turn against the canned travel source: thinking events, a
/// tool execution before Complete, and recorded history.
#[tokio::test]
async fn test_agent_round_trip() {
    let agent = TripAgent::new(Arc::new(MockTravelSource::new()), &quiet_config());

    let mut events = Vec::new();
    let answer = agent
        .stream_message("trip", "What should I do in Paris?", |e| events.push(e.clone()))
        .await
        .unwrap();

    assert!(answer.contains("Paris is a great choice!"));
    assert_eq!(events.last().unwrap().kind, EventKind::Complete);

    let result = events
        .iter()
        .find(|e| e.kind == EventKind::ToolResult)
        .expect("tool result emitted");
    assert!(result.content.contains("Weather for Paris"));
    assert!(result.content.contains("Current time in Paris"));

    let complete_pos = events.iter().position(|e| e.kind == EventKind::Complete).unwrap();
    let result_pos = events.iter().position(|e| e.kind == EventKind::ToolResult).unwrap();
    assert!(result_pos < complete_pos);

    assert_eq!(agent.sessions().len("trip"), 2);
}

/// A scripted provider failure surfaces as Error/Complete events and an
/// error from the agent, leaving the session history untouched.
#[tokio::test]
async fn test_agent_stream_failure() {
    let source = ScriptedSource::new(["so far so good "]).with_error("quota exceeded");
    let agent = TripAgent::new(Arc::new(source), &quiet_config());

    let mut events = Vec::new();
    let outcome = agent.stream_message("trip", "hello", |e| events.push(e.clone())).await;

    assert!(outcome.is_err());
    let kinds: Vec<EventKind> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds.last(), Some(&EventKind::Complete));
    assert!(kinds.contains(&EventKind::Error));
    assert!(agent.sessions().is_empty("trip"));
}

/// The non-streaming path returns a standardized record with markers
/// stripped and feeds the same session history as streaming turns.
#[tokio::test]
async fn test_agent_ask_path() {
    let agent = TripAgent::new(Arc::new(MockTravelSource::new()), &quiet_config());

    let standardized = agent.process_message("trip", "Tell me about Tokyo").await.unwrap();
    assert!(standardized.success);
    assert_eq!(standardized.provider, "mock");
    assert!(!standardized.response.contains("<thinking>"));

    let history = agent.sessions().history("trip");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, standardized.response);
}

/// History is pruned to the configured cap across many turns.
#[tokio::test]
async fn test_history_pruning() {
    let mut config = quiet_config();
    config.memory.max_messages = 4;
    config.memory.context_messages = 4;
    let source: Arc<dyn TokenSource> = Arc::new(ScriptedSource::new(["noted."]));
    let agent = TripAgent::new(source, &config);

    for i in 0..5 {
        agent.stream_message("trip", &format!("message {i}"), |_| {}).await.unwrap();
    }

    let history = agent.sessions().history("trip");
    assert_eq!(history.len(), 4);
    assert_eq!(history[2].content, "message 4");
}
