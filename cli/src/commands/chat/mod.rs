//! # Bunny Interactive Chat
//!
//! File: cli/src/commands/chat/mod.rs
//!
//! ## Overview
//!
//! `bunny chat` runs a conversation in the terminal: Bunny introduces itself,
//! then answers each line you type until you say goodbye, type an exit word,
//! or close standard input.
//!
//! ## Examples
//!
//! ```bash
//! # Start a conversation
//! bunny chat
//!
//! # Enable the goodbye/recommendation steps and rename the bot
//! bunny chat --farewell --name Clover
//!
//! # Scripted conversation
//! printf 'I feel anxious today\nbye\n' | bunny chat
//! ```
//!
use crate::core::config::Config;
use crate::core::error::Result;
use crate::engine;
use clap::Parser;
use std::io;
use tracing::info;

/// The line-oriented conversation loop.
pub mod repl;

/// # Chat Command Arguments (`ChatArgs`)
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Enable the exit-trigger goodbye and the farewell recommendation.
    #[arg(long)]
    pub farewell: bool,

    /// Name the bot introduces itself with (overrides `chat.bot_name`).
    #[arg(long, short)]
    pub name: Option<String>,
}

/// # Handle Chat Command (`handle_chat`)
///
/// Builds the engine from the effective configuration, applies the
/// command-line overrides and runs the loop on stdin/stdout.
pub async fn handle_chat(args: ChatArgs, config: &Config) -> Result<()> {
    info!("Handling chat command with args: {:?}", args);

    let mut settings = config.chat.clone();
    if let Some(name) = args.name {
        settings.bot_name = name;
    }

    let engine =
        engine::build_engine(config, args.farewell)?.with_bot_name(settings.bot_name.clone());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = repl::run_chat(&engine, &settings, stdin.lock(), stdout.lock())?;
    info!(
        "Conversation ended ({:?}) in state {}",
        summary.end,
        summary.session.state()
    );
    Ok(())
}
