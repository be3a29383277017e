//! # Bunny Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the Bunny CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the configuration shared by every command
//! - Routing execution to appropriate command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! bunny --help
//!
//! # Chat with debug logging of every rule and state change
//! bunny -vv chat
//!
//! # Use an explicit configuration file
//! bunny --config ./bunny.toml serve
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Load and validate configuration
//! 4. Route to appropriate command handler
//! 5. Format and display any errors that occur
//!
use bunny::commands;
use bunny::core::config;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "bunny",
    about = "🐰 Bunny: a small rule-based supportive chat companion",
    long_about = "Talk things through with Bunny in the terminal, or serve the same\n\
                  conversation engine over HTTP.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Configuration file to use instead of the user and project files.
    #[arg(long, global = true, env = "BUNNY_CONFIG")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Talk with Bunny in the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Serve the conversation engine over HTTP.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Print the keyword and response tables.
    Tables(commands::tables::TablesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match config::load_config(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Chat(args) => commands::chat::handle_chat(args, &config).await,
            Commands::Serve(args) => commands::serve::handle_serve(args, &config).await,
            Commands::Tables(args) => commands::tables::handle_tables(args, &config).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
