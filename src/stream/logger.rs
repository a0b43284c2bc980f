//! Colorized terminal observer for classified events
//!
//! Purely a debugging/demo aid: prints phase transitions and live thinking
//! text to stderr so a developer can watch a response being classified.
//! Response content is NOT echoed here since the caller renders it.

use colored::*;
use std::io::Write;

use crate::stream::event::{ClassifiedEvent, EventKind};

/// Stderr observer attached to a classifier when terminal logging is enabled
#[derive(Debug, Default, Clone)]
pub struct EventLogger;

impl EventLogger {
    pub fn new() -> Self {
        Self
    }

    /// Print a one-line (or inline, for thinking text) trace of the event
    pub fn observe(&self, event: &ClassifiedEvent) {
        match event.kind {
            EventKind::ThinkingStart => {
                eprintln!("{}", "[thinking] reasoning started".cyan());
            }
            EventKind::Thinking => {
                // Inline so the reasoning reads as continuous text
                eprint!("{}", event.content.blue());
                let _ = std::io::stderr().flush();
            }
            EventKind::ThinkingEnd => {
                eprintln!();
                eprintln!("{}", "[thinking] reasoning complete".cyan());
            }
            EventKind::ToolCall => {
                eprintln!("{} {}", "[tool]".yellow(), event.content.yellow());
            }
            EventKind::ToolResult => {
                eprintln!("{} {}", "[tool]".yellow(), event.content);
            }
            EventKind::Error => {
                eprintln!("{}", event.content.red());
            }
            EventKind::Complete => {
                eprintln!("{}", "[stream] complete".cyan());
            }
            // Response text is rendered by the caller; remaining control
            // events carry no content worth echoing.
            _ => {}
        }
    }
}
