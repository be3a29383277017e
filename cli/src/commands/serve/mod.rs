//! # Bunny HTTP Adapter
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `bunny serve` exposes the response engine over HTTP so a web or mobile
//! front end can hold conversations. Each conversation gets its own session,
//! identified by a UUID returned from the first `POST /chat`.
//!
//! ## Architecture
//!
//! - `config.rs`: merges command-line flags over the `[server]` config section
//! - `state.rs`: shared engine and session store
//! - `handlers.rs`: JSON endpoints
//! - `server_logic.rs`: router, port selection, graceful shutdown
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the default address (127.0.0.1:8000)
//! bunny serve
//!
//! # Listen on all interfaces, port 9000, without CORS
//! bunny serve --host 0.0.0.0 --port 9000 --no-cors
//!
//! # Talk to it
//! curl -s localhost:8000/chat -H 'content-type: application/json' -d '{"message": "hi"}'
//! ```
//!
use crate::core::config::Config;
use crate::core::error::Result;
use crate::engine;
use tracing::info;

pub use config::ServeArgs;

/// Resolves server settings from arguments and configuration.
pub mod config;

/// JSON request handlers.
pub mod handlers;

/// Contains the core Axum-based HTTP server implementation.
pub mod server_logic;

/// Shared state handed to every handler.
pub mod state;

/// # Handle Serve Command (`handle_serve`)
///
/// Builds the engine, resolves the effective server settings and runs the
/// server until it is shut down.
pub async fn handle_serve(args: ServeArgs, config: &Config) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let settings = config::resolve_settings(&args, &config.server)?;
    info!("Effective server settings: {:?}", settings);

    let engine = engine::build_engine(config, args.farewell)?;
    let state = state::AppState::new(engine, settings.session_ttl);
    server_logic::run_server(settings, state).await
}
