//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - chat: interactive streaming conversation
//! - ask: single non-streaming question
//! - tools: list the available travel tools

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wayfarer - a streaming travel-assistant chat demo
#[derive(Parser, Debug)]
#[command(name = "wayfarer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat with streamed, classified output
    Chat {
        /// Session ID for conversation history
        #[arg(short, long, default_value = "default")]
        session: String,
    },

    /// Ask a single question and print the standardized answer
    Ask {
        /// The question to ask
        message: String,

        /// Session ID for conversation history
        #[arg(short, long, default_value = "default")]
        session: String,
    },

    /// List the available travel tools
    Tools,
}
