//! # Bunny HTTP Server Configuration
//!
//! File: cli/src/commands/serve/config.rs
//!
//! ## Overview
//!
//! Resolves the effective server settings for `bunny serve` from:
//! 1. Command-line arguments (highest priority)
//! 2. The `[server]` section of the loaded configuration
//! 3. Default values (lowest priority, already applied by `core::config`)
//!
//! Unlike configuration files, command-line values are `Option`s here, so an
//! argument only overrides the file when it was actually given.
//!
use crate::core::config::ServerSection;
use crate::core::error::{BunnyError, Result};
use clap::Parser;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

/// # Serve Command Arguments (`ServeArgs`)
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on (default from config, else 8000). The next free port
    /// is used if it is taken.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// IP address to bind to, e.g. `0.0.0.0` for all interfaces.
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Do not send CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    /// Enable the exit-trigger goodbye and the farewell recommendation.
    #[arg(long)]
    pub farewell: bool,
}

/// # Effective Server Settings (`ServerSettings`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
    /// Idle time after which a session is discarded.
    pub session_ttl: Duration,
}

/// Merges command-line arguments over the `[server]` configuration section.
pub fn resolve_settings(args: &ServeArgs, section: &ServerSection) -> Result<ServerSettings> {
    let host = match args.host {
        Some(host) => host,
        None => section.host.parse().map_err(|e| {
            BunnyError::Config(format!("Invalid server host '{}': {}", section.host, e))
        })?,
    };
    let settings = ServerSettings {
        host,
        port: args.port.unwrap_or(section.port),
        enable_cors: section.cors_enabled() && !args.no_cors,
        session_ttl: Duration::from_secs(section.session_ttl_secs),
    };
    debug!("Resolved server settings: {:?}", settings);
    Ok(settings)
}
