//! Streaming token classification
//!
//! This module is the core of the crate:
//! - event types emitted to consumers
//! - marker registries for thinking sections and tool calls
//! - the stateful fragment classifier
//! - SSE wire encoding
//! - standardization of non-streaming provider responses
//! - an optional colorized terminal observer

pub mod classifier;
pub mod event;
pub mod logger;
pub mod markers;
pub mod sse;
pub mod standardize;

pub use classifier::StreamClassifier;
pub use event::{ClassifiedEvent, EventKind};
pub use logger::EventLogger;
pub use markers::{MarkerSet, ToolCallMatch};
pub use sse::format_sse_event;
pub use standardize::{StandardResponse, standardize_response};
