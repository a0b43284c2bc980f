//! CLI module for wayfarer - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for chatting,
//! one-shot questions, and tool inspection.

pub mod commands;

pub use commands::Cli;
