//! # Bunny HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! This module runs the Axum server behind `bunny serve`:
//! - Port availability checking with automatic fallback
//! - CORS configuration
//! - Request tracing
//! - Periodic eviction of idle sessions
//! - Graceful shutdown handling
//!
//! ## Architecture
//!
//! 1. Find an available port if the requested one is in use
//! 2. Build the router (`create_app`) around the shared `AppState`
//! 3. Start the session reaper in the background
//! 4. Print connection information
//! 5. Serve until Ctrl+C or SIGTERM, then stop the reaper
//!
use super::config::ServerSettings;
use super::handlers;
use super::state::AppState;
use crate::core::error::{BunnyError, Result};
use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, warn, Level};

const MAX_PORT_ATTEMPTS: u8 = 10;

/// Upper bound on how long an expired session can linger between sweeps.
const MAX_REAP_INTERVAL: Duration = Duration::from_secs(60);

/// # Run HTTP Server (`run_server`)
///
/// Binds the first free port at or after `settings.port`, prints where the
/// server can be reached and serves `state` until a shutdown signal arrives.
pub async fn run_server(settings: ServerSettings, state: AppState) -> Result<()> {
    let addr = find_available_port(settings.host, settings.port, MAX_PORT_ATTEMPTS).await?;
    let farewell = state.engine.farewell_path();
    let reaper = spawn_session_reaper(state.clone(), reap_interval(settings.session_ttl));
    let app = create_app(state, settings.enable_cors);

    println!("\n=================================================================");
    println!("🐰 Bunny is listening");
    println!("🌐 Chat endpoint:     http://{}/chat", addr);
    println!("❤️  Health check:      http://{}/health", addr);
    println!("🔒 CORS enabled:      {}", settings.enable_cors);
    println!("👋 Farewell path:     {}", farewell);
    println!("⏳ Session idle TTL:  {}s", settings.session_ttl.as_secs());
    println!("=================================================================\n");

    info!("Starting server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    let served = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed");

    // The reaper loops forever; it only stops here.
    reaper.abort();
    served?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Sweep often enough that a session outlives its TTL by at most half the
/// TTL, but never more than once a second.
fn reap_interval(session_ttl: Duration) -> Duration {
    (session_ttl / 2).clamp(Duration::from_secs(1), MAX_REAP_INTERVAL)
}

/// # Spawn Session Reaper (`spawn_session_reaper`)
///
/// Starts a background task that evicts idle sessions every `period`, so
/// abandoned conversations are reclaimed even when no requests arrive.
fn spawn_session_reaper(state: AppState, period: Duration) -> JoinHandle<()> {
    info!("Session reaper started (every {:?})", period);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            match state.evict_idle_sessions(Utc::now()) {
                Ok(0) => {}
                Ok(evicted) => debug!("Evicted {} idle sessions", evicted),
                Err(e) => {
                    // A poisoned store stays poisoned; nothing left to sweep.
                    error!("Session reaper stopping: {}", e);
                    break;
                }
            }
        }
    })
}

/// Resolves when Ctrl+C (or SIGTERM on Unix) is received.
async fn shutdown_signal() {
    // Ctrl+C from the terminal running `bunny serve`.
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                // Without a handler only SIGTERM (or killing the process) stops the server.
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    // SIGTERM from a service manager or container runtime.
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    // No SIGTERM outside Unix; this branch never fires.
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // Whichever signal comes first starts the shutdown.
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Probes up to `max_attempts` consecutive ports starting at `start_port`
/// and returns the first address that can be bound.
///
/// ## Errors
///
/// `BunnyError::Server` when every candidate is taken, or when the range
/// would run past port 65535.
async fn find_available_port(
    req_host: IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    // `start_port..=u16::MAX` is empty past the top of the port range, so the
    // search cannot wrap around to port 0.
    let candidates = (start_port..=u16::MAX).take(usize::from(max_attempts));

    for port in candidates {
        let addr = SocketAddr::new(req_host, port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                // Only probing: release the port for the real bind in `run_server`.
                drop(listener);
                if port != start_port {
                    info!(
                        "Port {} was unavailable, using port {} instead.",
                        start_port, port
                    );
                }
                return Ok(addr);
            }
            Err(e) => warn!("Port {} on host {} is unavailable ({}).", port, req_host, e),
        }
    }

    Err(BunnyError::Server(format!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host, start_port, max_attempts
    ))
    .into())
}

/// # Create Axum Application (`create_app`)
///
/// Builds the router with all chat routes plus tracing and (optionally
/// permissive) CORS middleware.
pub fn create_app(state: AppState, enable_cors: bool) -> Router {
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route(
            "/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer),
        )
        .with_state(state)
}
