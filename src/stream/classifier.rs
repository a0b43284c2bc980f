//! Streaming token classifier
//!
//! Converts an ordered sequence of arbitrary-sized text fragments from an
//! LLM into an ordered sequence of [`ClassifiedEvent`]s, separating hidden
//! reasoning from the visible answer and spotting textual tool invocations.
//!
//! Fragment boundaries are meaningless: a marker like `</thinking>` can
//! arrive split across fragments. The classifier therefore appends each
//! fragment to a pending buffer and only classifies the prefix that cannot
//! still be part of an incomplete marker; a tail that is a proper prefix of
//! some marker is held until more text arrives. Text seen before a thinking
//! section opens is buffered rather than emitted, because the model's
//! preamble ("I will check.") is not part of the final answer when a
//! reasoning block follows. If the stream ends with no thinking section,
//! the buffered text IS the answer and is flushed at completion.

use serde_json::Value;

use crate::stream::event::{ClassifiedEvent, EventKind};
use crate::stream::logger::EventLogger;
use crate::stream::markers::MarkerSet;

/// Logical phase of one in-flight response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No thinking section seen yet (also the terminal phase for
    /// responses that never use thinking markers)
    Idle,
    /// Inside a thinking section
    InThinking,
    /// Thinking section closed; everything else is answer text
    AfterThinking,
}

/// Stateful classifier for one response stream at a time.
///
/// One instance per in-flight response; call [`reset`](Self::reset) before
/// reusing it for the next response in the same session.
#[derive(Debug)]
pub struct StreamClassifier {
    markers: MarkerSet,
    logger: Option<EventLogger>,

    phase: Phase,
    // One-shot latches: a response gets at most one thinking section and
    // one reported tool call. A second section is answer text.
    thinking_started: bool,
    thinking_ended: bool,
    tool_call_detected: bool,

    /// Every fragment ever seen, for cross-fragment extraction fallbacks
    raw: String,
    /// Unclassified tail (possible split marker)
    pending: String,
    /// Text seen before any thinking marker; discarded if thinking starts,
    /// flushed as the answer if it never does
    preamble: String,
    thinking: String,
    response: String,
    detected_tool_calls: Vec<String>,
}

impl StreamClassifier {
    pub fn new(logging_enabled: bool) -> Self {
        let mut classifier = Self {
            markers: MarkerSet::new(),
            logger: logging_enabled.then(EventLogger::new),
            phase: Phase::Idle,
            thinking_started: false,
            thinking_ended: false,
            tool_call_detected: false,
            raw: String::new(),
            pending: String::new(),
            preamble: String::new(),
            thinking: String::new(),
            response: String::new(),
            detected_tool_calls: Vec::new(),
        };
        classifier.reset();
        classifier
    }

    /// Clear all per-response state. Must be called between responses when
    /// reusing one instance; never fails.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.thinking_started = false;
        self.thinking_ended = false;
        self.tool_call_detected = false;
        self.raw.clear();
        self.pending.clear();
        self.preamble.clear();
        self.thinking.clear();
        self.response.clear();
        self.detected_tool_calls.clear();
    }

    /// Classify one fragment, returning the events it produced.
    /// Empty fragments are no-ops.
    pub fn process_fragment(&mut self, fragment: &str) -> Vec<ClassifiedEvent> {
        let mut events = Vec::new();
        if fragment.is_empty() {
            return events;
        }
        self.raw.push_str(fragment);
        self.pending.push_str(fragment);
        self.drain(&mut events);
        events
    }

    /// Flush held text and emit the terminal `Complete` event.
    pub fn finish(&mut self) -> Vec<ClassifiedEvent> {
        let mut events = Vec::new();
        match self.phase {
            Phase::Idle => {
                let text = format!("{}{}", self.preamble, self.pending);
                self.preamble.clear();
                self.pending.clear();
                self.flush_response(&text, &mut events);
            }
            Phase::InThinking => {
                let text = std::mem::take(&mut self.pending);
                self.flush_thinking(&text, &mut events);
            }
            Phase::AfterThinking => {
                let text = std::mem::take(&mut self.pending);
                self.flush_response(&text, &mut events);
            }
        }
        events.push(self.completion_event());
        events
    }

    /// Classify a whole fragment sequence. Resets first. A source error
    /// becomes one `Error` event and stops consumption; the returned
    /// sequence always ends with exactly one `Complete` event.
    pub fn process_stream<I, E>(&mut self, fragments: I) -> Vec<ClassifiedEvent>
    where
        I: IntoIterator<Item = std::result::Result<String, E>>,
        E: std::fmt::Display,
    {
        self.reset();
        let mut events = Vec::new();
        for item in fragments {
            match item {
                Ok(fragment) => events.extend(self.process_fragment(&fragment)),
                Err(e) => {
                    events.push(self.error_event(&e.to_string()));
                    events.push(self.completion_event());
                    return events;
                }
            }
        }
        events.extend(self.finish());
        events
    }

    /// Non-streaming path: classify an already-complete response text.
    pub fn process_text(&mut self, text: &str) -> Vec<ClassifiedEvent> {
        self.reset();
        let mut events = self.process_fragment(text);
        events.extend(self.finish());
        events
    }

    /// Stream-failure event (`error_type = "parsing_error"`).
    pub fn error_event(&self, message: &str) -> ClassifiedEvent {
        let event = ClassifiedEvent::new(EventKind::Error, format!("Error parsing stream: {message}"))
            .with_meta("error_type", "parsing_error");
        self.observe(&event);
        event
    }

    /// Terminal event with stream statistics.
    pub fn completion_event(&self) -> ClassifiedEvent {
        let event = ClassifiedEvent::new(EventKind::Complete, "")
            .with_meta("final_response_length", self.response.chars().count() as u64)
            .with_meta("thinking_length", self.thinking.chars().count() as u64)
            .with_meta("had_thinking", self.thinking_started);
        self.observe(&event);
        event
    }

    /// Best available clean final text, callable at any time (idempotent).
    ///
    /// Priority: closed thinking section -> the response buffer is
    /// authoritative; no thinking at all -> strip markers from everything
    /// seen; unterminated thinking -> text after the last end marker in the
    /// raw accumulator, else whatever response text was gathered.
    pub fn extract_final_response(&self) -> String {
        if self.thinking_ended {
            self.response.trim().to_string()
        } else if !self.thinking_started {
            self.markers.strip(&self.raw).trim().to_string()
        } else if let Some(tail) = self.markers.after_last_end(&self.raw) {
            self.markers.strip(tail).trim().to_string()
        } else {
            self.response.trim().to_string()
        }
    }

    pub fn had_thinking(&self) -> bool {
        self.thinking_started
    }

    pub fn thinking_text(&self) -> &str {
        &self.thinking
    }

    pub fn response_text(&self) -> &str {
        &self.response
    }

    /// Human-readable records of detected tool calls, in detection order
    pub fn detected_tool_calls(&self) -> &[String] {
        &self.detected_tool_calls
    }

    /// Classify as much of the pending buffer as is currently safe.
    fn drain(&mut self, events: &mut Vec<ClassifiedEvent>) {
        loop {
            match self.phase {
                Phase::Idle => {
                    if let Some((start, end)) = self.markers.find_start(&self.pending) {
                        let before = self.pending[..start].to_string();
                        self.pending = self.pending[end..].to_string();
                        self.preamble.push_str(&before);
                        self.thinking_started = true;
                        self.phase = Phase::InThinking;
                        // The reasoning block supersedes any preamble text;
                        // the answer comes after the block.
                        self.preamble.clear();
                        let event = ClassifiedEvent::new(EventKind::ThinkingStart, "")
                            .with_meta("transition", "entering_thinking");
                        self.emit(events, event);
                    } else {
                        let safe_len = self.markers.held_suffix_start(&self.pending);
                        if safe_len > 0 {
                            let safe: String = self.pending.drain(..safe_len).collect();
                            self.preamble.push_str(&safe);
                        }
                        break;
                    }
                }
                Phase::InThinking => {
                    if let Some((start, end)) = self.markers.find_end(&self.pending) {
                        let before = self.pending[..start].to_string();
                        self.pending = self.pending[end..].to_string();
                        self.flush_thinking(&before, events);
                        self.thinking_ended = true;
                        self.phase = Phase::AfterThinking;
                        let event = ClassifiedEvent::new(EventKind::ThinkingEnd, "")
                            .with_meta("transition", "exiting_thinking");
                        self.emit(events, event);
                    } else {
                        let safe_len = self.markers.held_suffix_start(&self.pending);
                        if safe_len > 0 {
                            let safe: String = self.pending.drain(..safe_len).collect();
                            self.flush_thinking(&safe, events);
                        }
                        break;
                    }
                }
                Phase::AfterThinking => {
                    let safe_len = self.markers.held_suffix_start(&self.pending);
                    if safe_len > 0 {
                        let safe: String = self.pending.drain(..safe_len).collect();
                        self.flush_response(&safe, events);
                    }
                    break;
                }
            }
        }
    }

    /// Emit thinking text, scanning the accumulated reasoning for the first
    /// tool invocation (tool calls may themselves span fragments).
    fn flush_thinking(&mut self, piece: &str, events: &mut Vec<ClassifiedEvent>) {
        let clean = self.markers.strip(piece);
        if clean.is_empty() {
            return;
        }
        if !self.tool_call_detected {
            let candidate = format!("{}{}", self.thinking, clean);
            if let Some(call) = self.markers.find_tool_call(&candidate) {
                self.tool_call_detected = true;
                let record = call.record();
                self.detected_tool_calls.push(record.clone());
                let start = ClassifiedEvent::new(EventKind::ToolCallStart, "")
                    .with_meta("tool_name", call.name.clone());
                self.emit(events, start);
                let body = ClassifiedEvent::new(EventKind::ToolCall, record)
                    .with_meta("tool_name", call.name.clone())
                    .with_meta("parameters", call.args.clone());
                self.emit(events, body);
                let end =
                    ClassifiedEvent::new(EventKind::ToolCallEnd, "").with_meta("tool_name", call.name);
                self.emit(events, end);
            }
        }
        self.thinking.push_str(&clean);
        let event = ClassifiedEvent::new(EventKind::Thinking, clean)
            .with_meta("thinking_length", self.thinking.chars().count() as u64);
        self.emit(events, event);
    }

    /// Emit answer text; whitespace-only pieces are dropped so consumers
    /// aren't flooded with no-op events.
    fn flush_response(&mut self, piece: &str, events: &mut Vec<ClassifiedEvent>) {
        let clean = self.markers.strip(piece);
        if clean.trim().is_empty() {
            return;
        }
        self.response.push_str(&clean);
        let event = ClassifiedEvent::new(EventKind::Response, clean)
            .with_meta("response_length", self.response.chars().count() as u64);
        self.emit(events, event);
    }

    fn emit(&self, events: &mut Vec<ClassifiedEvent>, event: ClassifiedEvent) {
        self.observe(&event);
        events.push(event);
    }

    fn observe(&self, event: &ClassifiedEvent) {
        if let Some(logger) = &self.logger {
            logger.observe(event);
        }
    }
}

/// Metadata value helper for assertions and wire building
pub fn meta_bool(event: &ClassifiedEvent, key: &str) -> Option<bool> {
    event.metadata.get(key).and_then(Value::as_bool)
}
