//! Thinking and tool-call marker registries
//!
//! Markers are fixed and provider-agnostic: different models fence their
//! reasoning with different syntax (`<thinking>`, `<think>`, `**thinking**`,
//! `[thinking]`, ...) and announce tool use in several textual shapes. All
//! matching is case-insensitive. Alternation order matters: longer forms are
//! listed before their prefixes so `<thinking>` never half-strips as
//! `<think>` plus a dangling `ing>`.

use regex::Regex;
use std::sync::LazyLock;

static THINKING_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<thinking>|<think>|<reasoning>|<analysis>|\*\*thinking\*\*|\[thinking\]")
        .expect("thinking start patterns compile")
});

static THINKING_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</thinking>|</think>|</reasoning>|</analysis>|\*\*/thinking\*\*|\[/thinking\]")
        .expect("thinking end patterns compile")
});

/// Tool-call shapes, tried in order. Each has exactly two capture groups:
/// (tool name, raw argument text).
static TOOL_CALLS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)TOOL_CALL:\s*(\w+)\s*\(([^)]*)\)",
        r"(?i)Using tool:\s*(\w+)\s+with parameters\s+(.+)",
        r"(?i)Calling\s+(\w+)\s+tool\s+with\s+(.+)",
        r"\[(\w+)\]\(([^)]*)\)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("tool call patterns compile"))
    .collect()
});

/// Every marker literal, lowercase. Used to decide whether the tail of a
/// buffer could still be the beginning of a marker split across fragments.
const MARKER_LITERALS: &[&str] = &[
    "<thinking>",
    "<think>",
    "<reasoning>",
    "<analysis>",
    "**thinking**",
    "[thinking]",
    "</thinking>",
    "</think>",
    "</reasoning>",
    "</analysis>",
    "**/thinking**",
    "[/thinking]",
];

/// Longest marker is `**/thinking**` (13 bytes), so a held tail never
/// exceeds 12 bytes.
const MAX_HELD_SUFFIX: usize = 12;

/// A detected tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallMatch {
    pub name: String,
    pub args: String,
}

impl ToolCallMatch {
    /// Human-readable record stored by the classifier,
    /// e.g. `"Tool: WeatherTool, Parameters: city=Paris"`
    pub fn record(&self) -> String {
        format!("Tool: {}, Parameters: {}", self.name, self.args)
    }
}

/// Compiled marker registries for one classifier instance
#[derive(Debug, Clone)]
pub struct MarkerSet {
    start: Regex,
    end: Regex,
    tool_calls: Vec<Regex>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self {
            start: THINKING_START.clone(),
            end: THINKING_END.clone(),
            tool_calls: TOOL_CALLS.clone(),
        }
    }

    /// Does the text contain any thinking-start marker?
    pub fn has_thinking_start(&self, text: &str) -> bool {
        self.start.is_match(text)
    }

    /// Does the text contain any thinking-end marker?
    pub fn has_thinking_end(&self, text: &str) -> bool {
        self.end.is_match(text)
    }

    /// Remove every start and end marker substring
    pub fn strip(&self, text: &str) -> String {
        let without_start = self.start.replace_all(text, "");
        self.end.replace_all(&without_start, "").into_owned()
    }

    /// First tool invocation in the text, if any shape matches
    pub fn find_tool_call(&self, text: &str) -> Option<ToolCallMatch> {
        for pattern in &self.tool_calls {
            if let Some(caps) = pattern.captures(text) {
                let name = caps.get(1)?.as_str().to_string();
                let args = caps.get(2)?.as_str().trim().to_string();
                return Some(ToolCallMatch { name, args });
            }
        }
        None
    }

    /// Byte range of the first thinking-start marker, if any
    pub fn find_start(&self, text: &str) -> Option<(usize, usize)> {
        self.start.find(text).map(|m| (m.start(), m.end()))
    }

    /// Byte range of the first thinking-end marker, if any
    pub fn find_end(&self, text: &str) -> Option<(usize, usize)> {
        self.end.find(text).map(|m| (m.start(), m.end()))
    }

    /// Text after the last thinking-end marker, if one occurs
    pub fn after_last_end<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.end.find_iter(text).last().map(|m| &text[m.end()..])
    }

    /// Start of the longest suffix that is a proper prefix of some marker.
    /// Text before the returned index is safe to classify; text at and after
    /// it might become a marker once more fragments arrive and must be held
    /// back. Returns `text.len()` when the whole buffer is safe.
    pub fn held_suffix_start(&self, text: &str) -> usize {
        let mut i = text.len().saturating_sub(MAX_HELD_SUFFIX);
        while !text.is_char_boundary(i) {
            i += 1;
        }
        while i < text.len() {
            let suffix = text[i..].as_bytes();
            let is_partial = MARKER_LITERALS
                .iter()
                .any(|m| m.len() > suffix.len() && m.as_bytes()[..suffix.len()].eq_ignore_ascii_case(suffix));
            if is_partial {
                return i;
            }
            match text[i..].chars().next() {
                Some(c) => i += c.len_utf8(),
                None => break,
            }
        }
        text.len()
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::new()
    }
}
