use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use wayfarer::agent::TripAgent;
use wayfarer::cli::Cli;
use wayfarer::cli::commands::Commands;
use wayfarer::config::Config;
use wayfarer::provider::{MockTravelSource, TokenSource};
use wayfarer::stream::EventKind;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wayfarer")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("wayfarer.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_source(config: &Config) -> Arc<dyn TokenSource> {
    match config.provider.name.as_str() {
        "mock" => Arc::new(MockTravelSource::new()),
        other => {
            log::warn!("Unknown provider '{}', falling back to mock", other);
            Arc::new(MockTravelSource::new())
        }
    }
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let agent = TripAgent::new(build_source(config), config);

    match &cli.command {
        None => run_chat(&agent, "default", config).await,
        Some(Commands::Chat { session }) => run_chat(&agent, session, config).await,
        Some(Commands::Ask { message, session }) => {
            run_ask(&agent, session, message, cli.is_verbose()).await
        }
        Some(Commands::Tools) => list_tools(&agent),
    }
}

async fn run_chat(agent: &TripAgent, session: &str, config: &Config) -> Result<()> {
    info!("Starting chat session: {}", session);
    println!("{}", "Wayfarer travel assistant. Type 'exit' to quit, 'clear' to forget the conversation.".cyan());

    let delay = if config.streaming.enabled {
        Duration::from_millis(config.streaming.delay_ms)
    } else {
        Duration::ZERO
    };

    let stdin = std::io::stdin();
    loop {
        print!("{} ", "you>".green());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let bytes = stdin.lock().read_line(&mut line).context("Failed to read input")?;
        if bytes == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        match message {
            "exit" | "quit" => break,
            "clear" => {
                agent.clear_session(session);
                println!("{}", "Conversation cleared.".yellow());
                continue;
            }
            _ => {}
        }

        let outcome = agent
            .stream_message(session, message, |event| {
                match event.kind {
                    EventKind::Response => {
                        print!("{}", event.content);
                        let _ = std::io::stdout().flush();
                        if !delay.is_zero() {
                            std::thread::sleep(delay);
                        }
                    }
                    EventKind::ToolResult => {
                        println!("\n{} {}", "tool result:".yellow(), event.content);
                    }
                    EventKind::Complete => println!(),
                    _ => {}
                }
            })
            .await;

        if let Err(e) = outcome {
            println!("{} {}", "error:".red(), e);
        }
    }

    println!("{}", "Safe travels!".cyan());
    Ok(())
}

async fn run_ask(agent: &TripAgent, session: &str, message: &str, verbose: bool) -> Result<()> {
    info!("Processing single question on session: {}", session);

    let standardized = agent
        .process_message(session, message)
        .await
        .context("Failed to process message")?;

    if verbose {
        println!(
            "{} {} ({})",
            "provider:".cyan(),
            standardized.provider,
            standardized.model
        );
    }

    if standardized.success {
        println!("{}", standardized.response);
    } else {
        let reason = standardized.error.unwrap_or_else(|| "Unknown error occurred".to_string());
        println!("{} {}", "error:".red(), reason);
        if standardized.rate_limited {
            println!("{}", "The provider is rate limiting requests; try again shortly.".yellow());
        }
    }

    Ok(())
}

fn list_tools(agent: &TripAgent) -> Result<()> {
    info!("Listing tools");
    println!("{}", "Available tools:".cyan());
    for definition in agent.tools().definitions() {
        println!("  {} - {}", definition.name.green(), definition.description);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("{} {}", "config error:".red(), problem);
        }
        return Err(eyre!("invalid configuration"));
    }

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
