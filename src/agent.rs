//! Travel-assistant agent
//!
//! Glues the pieces together for one conversation turn: builds the prompt
//! from session history, pumps source fragments through a fresh classifier,
//! executes the detected tool call, and records the exchange. Each turn
//! gets its own classifier instance; the classifier is never shared across
//! in-flight responses.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::error::{Result, WayfarerError};
use crate::provider::TokenSource;
use crate::session::{Message, SessionStore};
use crate::stream::{
    ClassifiedEvent, EventKind, StandardResponse, StreamClassifier, standardize_response,
};
use crate::tools::{ToolRegistry, parse_parameters};

const SYSTEM_PROMPT: &str = "You are Wayfarer, a helpful travel assistant. \
You answer questions about destinations, weather, local time, and trip planning. \
When you need to reason, put it inside <thinking>...</thinking> tags; the text after \
the closing tag is your answer. To use a tool, write TOOL_CALL: ToolName(city=...) \
inside your thinking section. Available tools: WeatherTool, TimeTool, CityFactsTool, \
PlanCityVisitTool.";

/// One agent serves many sessions; per-response state lives in the
/// classifier created inside each call.
pub struct TripAgent {
    source: Arc<dyn TokenSource>,
    sessions: SessionStore,
    tools: ToolRegistry,
    context_messages: usize,
    terminal_logging: bool,
}

impl TripAgent {
    pub fn new(source: Arc<dyn TokenSource>, config: &Config) -> Self {
        Self {
            source,
            sessions: SessionStore::new(config.memory.max_messages),
            tools: ToolRegistry::travel_tools(),
            context_messages: config.memory.context_messages,
            terminal_logging: config.streaming.terminal_logging,
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn clear_session(&self, session_id: &str) {
        self.sessions.clear(session_id);
    }

    fn build_prompt(&self, session_id: &str, message: &str) -> String {
        let history = self.sessions.format_history(session_id, self.context_messages);
        format!("{SYSTEM_PROMPT}\n\nConversation so far:\n{history}\n\nUser: {message}\nAssistant:")
    }

    /// Stream one turn, invoking `emit` for every classified event in
    /// order. Tool results are emitted before the terminal `Complete`.
    /// Returns the clean final response, which is also recorded in the
    /// session history.
    pub async fn stream_message(
        &self,
        session_id: &str,
        message: &str,
        mut emit: impl FnMut(&ClassifiedEvent),
    ) -> Result<String> {
        self.sessions.prune(session_id);
        let prompt = self.build_prompt(session_id, message);
        let mut classifier = StreamClassifier::new(self.terminal_logging);

        let (tx, mut rx) = mpsc::channel(32);
        let source = Arc::clone(&self.source);
        let producer = tokio::spawn(async move {
            source.stream(&prompt, tx).await;
        });

        let mut tool_requests: Vec<(String, String)> = Vec::new();
        let mut stream_error: Option<String> = None;

        while let Some(item) = rx.recv().await {
            match item {
                Ok(fragment) => {
                    for event in classifier.process_fragment(&fragment) {
                        record_tool_request(&event, &mut tool_requests);
                        emit(&event);
                    }
                }
                Err(e) => {
                    let description = e.to_string();
                    let event = classifier.error_event(&description);
                    emit(&event);
                    stream_error = Some(description);
                    break;
                }
            }
        }
        drop(rx);
        let _ = producer.await;

        if let Some(description) = stream_error {
            emit(&classifier.completion_event());
            return Err(WayfarerError::Provider(description));
        }

        // Flush held text now, but keep the terminal event for last so
        // tool results precede it.
        let mut tail = classifier.finish();
        let complete = tail.pop().ok_or_else(|| {
            WayfarerError::Session("classifier finished without a terminal event".to_string())
        })?;
        for event in tail {
            record_tool_request(&event, &mut tool_requests);
            emit(&event);
        }

        for (name, args) in tool_requests {
            debug!("Executing tool {} with args {:?}", name, args);
            let input = parse_parameters(&args);
            emit(&ClassifiedEvent::new(EventKind::ToolResultStart, "").with_meta("tool_name", name.clone()));
            let body = match self.tools.execute(&name, &input) {
                Ok(output) => {
                    ClassifiedEvent::new(EventKind::ToolResult, output).with_meta("tool_name", name.clone())
                }
                Err(e) => {
                    warn!("Tool {} failed: {}", name, e);
                    ClassifiedEvent::new(EventKind::ToolResult, format!("Tool execution failed: {e}"))
                        .with_meta("tool_name", name.clone())
                        .with_meta("is_error", true)
                }
            };
            emit(&body);
            emit(&ClassifiedEvent::new(EventKind::ToolResultEnd, "").with_meta("tool_name", name));
        }

        emit(&complete);

        let final_response = classifier.extract_final_response();
        self.sessions.append(session_id, Message::user(message));
        self.sessions
            .append(session_id, Message::assistant(final_response.clone()));
        self.sessions.prune(session_id);
        Ok(final_response)
    }

    /// Non-streaming turn: one completion call, standardized, with any
    /// thinking markers stripped from the response text.
    pub async fn process_message(&self, session_id: &str, message: &str) -> Result<StandardResponse> {
        self.sessions.prune(session_id);
        let prompt = self.build_prompt(session_id, message);
        let raw = self.source.complete(&prompt).await?;
        let mut standardized = standardize_response(&raw);

        if standardized.success {
            let mut classifier = StreamClassifier::new(false);
            classifier.process_text(&standardized.response);
            standardized.response = classifier.extract_final_response();
            self.sessions.append(session_id, Message::user(message));
            self.sessions
                .append(session_id, Message::assistant(standardized.response.clone()));
            self.sessions.prune(session_id);
        }

        Ok(standardized)
    }
}

fn record_tool_request(event: &ClassifiedEvent, requests: &mut Vec<(String, String)>) {
    if event.kind == EventKind::ToolCall {
        if let Some(name) = event.meta_str("tool_name") {
            let args = event.meta_str("parameters").unwrap_or_default();
            requests.push((name.to_string(), args.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockTravelSource, ScriptedSource};

    fn agent_with(source: Arc<dyn TokenSource>) -> TripAgent {
        let mut config = Config::default();
        config.streaming.terminal_logging = false;
        TripAgent::new(source, &config)
    }

    fn kinds(events: &[ClassifiedEvent]) -> Vec<EventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[tokio::test]
    async fn test_stream_turn_with_thinking_and_tool() {
        let source = ScriptedSource::new([
            "<thinking>",
            "Check Paris. TOOL_CALL: WeatherTool(city=Paris)",
            "</thinking>",
            "It's sunny in Paris.",
        ]);
        let agent = agent_with(Arc::new(source));

        let mut events = Vec::new();
        let final_response = agent
            .stream_message("s1", "Weather in Paris?", |e| events.push(e.clone()))
            .await
            .unwrap();

        assert_eq!(final_response, "It's sunny in Paris.");
        assert_eq!(
            kinds(&events),
            vec![
                EventKind::ThinkingStart,
                EventKind::ToolCallStart,
                EventKind::ToolCall,
                EventKind::ToolCallEnd,
                EventKind::Thinking,
                EventKind::ThinkingEnd,
                EventKind::Response,
                EventKind::ToolResultStart,
                EventKind::ToolResult,
                EventKind::ToolResultEnd,
                EventKind::Complete,
            ]
        );
        let result = events.iter().find(|e| e.kind == EventKind::ToolResult).unwrap();
        assert!(result.content.starts_with("Weather for Paris"));
    }

    #[tokio::test]
    async fn test_stream_records_history() {
        let source = ScriptedSource::new(["Lisbon is lovely in June."]);
        let agent = agent_with(Arc::new(source));

        agent.stream_message("s1", "When to visit Lisbon?", |_| {}).await.unwrap();
        let history = agent.sessions().history("s1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "When to visit Lisbon?");
        assert_eq!(history[1].content, "Lisbon is lovely in June.");
    }

    #[tokio::test]
    async fn test_stream_error_emits_events_and_fails() {
        let source = ScriptedSource::new(["partial "]).with_error("connection reset");
        let agent = agent_with(Arc::new(source));

        let mut events = Vec::new();
        let result = agent
            .stream_message("s1", "hello", |e| events.push(e.clone()))
            .await;

        assert!(matches!(result, Err(WayfarerError::Provider(_))));
        let tail: Vec<EventKind> = kinds(&events).into_iter().rev().take(2).collect();
        assert_eq!(tail, vec![EventKind::Complete, EventKind::Error]);
        // A failed turn is not recorded
        assert!(agent.sessions().is_empty("s1"));
    }

    #[tokio::test]
    async fn test_unknown_tool_reported_in_result() {
        let source = ScriptedSource::new([
            "<thinking>TOOL_CALL: FlightTool(city=Paris)</thinking>",
            "done",
        ]);
        let agent = agent_with(Arc::new(source));

        let mut events = Vec::new();
        agent.stream_message("s1", "flights?", |e| events.push(e.clone())).await.unwrap();

        let result = events.iter().find(|e| e.kind == EventKind::ToolResult).unwrap();
        assert!(result.content.contains("Tool execution failed"));
        assert!(result.content.contains("FlightTool"));
    }

    #[tokio::test]
    async fn test_process_message_strips_markers() {
        let source = MockTravelSource::new();
        let agent = agent_with(Arc::new(source));

        let standardized = agent.process_message("s1", "Tell me about Paris").await.unwrap();
        assert!(standardized.success);
        assert_eq!(standardized.provider, "mock");
        assert!(!standardized.response.contains("<thinking>"));
        assert!(standardized.response.contains("Paris is a great choice!"));
    }

    #[tokio::test]
    async fn test_history_feeds_following_turns() {
        let source = ScriptedSource::new(["Sure thing."]);
        let agent = agent_with(Arc::new(source));

        agent.stream_message("s1", "first", |_| {}).await.unwrap();
        agent.stream_message("s1", "second", |_| {}).await.unwrap();
        assert_eq!(agent.sessions().len("s1"), 4);

        agent.clear_session("s1");
        assert!(agent.sessions().is_empty("s1"));
    }
}
