//! Wayfarer - a streaming travel-assistant chat engine
//!
//! Wayfarer classifies a token stream from an LLM into thinking, tool-call,
//! and response events as fragments arrive, so a client can render reasoning
//! and answers differently without waiting for the full response.

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod provider;
pub mod session;
pub mod stream;
pub mod tools;

pub use error::{Result, WayfarerError};
