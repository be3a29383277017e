//! # Bunny Table Inspection
//!
//! File: cli/src/commands/tables.rs
//!
//! ## Overview
//!
//! `bunny tables` prints the tables the engine would use (built-in, or the
//! configured `engine.tables_file`) as TOML. The output is itself a valid
//! tables file, so the usual way to customize Bunny is:
//!
//! ```bash
//! bunny tables > ~/.config/bunny/tables.toml
//! $EDITOR ~/.config/bunny/tables.toml
//! ```
//!
//! With `--emotions` only the emotion order and keyword counts are shown;
//! the order matters because the first matching emotion wins.
//!
use crate::core::config::Config;
use crate::core::error::Result;
use crate::engine::{self, Tables};
use anyhow::Context;
use clap::Parser;
use tracing::info;

/// # Tables Command Arguments (`TablesArgs`)
#[derive(Parser, Debug)]
pub struct TablesArgs {
    /// Only list emotions in detection order with their keyword counts.
    #[arg(long)]
    pub emotions: bool,
}

pub async fn handle_tables(args: TablesArgs, config: &Config) -> Result<()> {
    info!("Handling tables command with args: {:?}", args);
    let engine = engine::build_engine(config, false)?;
    let rendered = if args.emotions {
        render_emotion_summary(engine.tables())
    } else {
        toml::to_string(engine.tables()).context("Failed to render tables as TOML")?
    };
    print!("{}", rendered);
    Ok(())
}

fn render_emotion_summary(tables: &Tables) -> String {
    let mut out = String::new();
    for (position, entry) in tables.emotions.iter().enumerate() {
        let canned = if entry.advice.is_some() { "canned" } else { "generic" };
        out.push_str(&format!(
            "{:>2}. {:<12} {:>2} keywords, {:>2} recommendations, {} advice\n",
            position + 1,
            entry.name,
            entry.keywords.len(),
            entry.recommendations.len(),
            canned
        ));
    }
    out
}
