//! # Bunny Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used by the outer layers of Bunny:
//! configuration loading, custom table files, the interactive chat loop and
//! the HTTP adapter. The response engine itself never fails; every input
//! string resolves to some reply.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `BunnyError`: A custom error enum using `thiserror` for specific error kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! ## Examples
//!
//! ```rust,ignore
//! // Return a specific error kind
//! if entry.keywords.is_empty() {
//!     return Err(BunnyError::Tables(format!("Emotion '{}' has no keywords", entry.name)))?;
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read tables file: {}", path.display()))?;
//!
//! // Pattern matching on error kinds
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<BunnyError>(), Some(BunnyError::SessionNotFound { .. })) => {
//!         println!("Session expired, starting a new one...");
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the Bunny application.
#[derive(Error, Debug)]
pub enum BunnyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid response tables: {0}")]
    Tables(String),

    #[error("Chat I/O failed: {source}")]
    ChatIo {
        #[from]
        source: std::io::Error,
    },

    #[error("Session '{id}' not found.")]
    SessionNotFound { id: String },

    #[error("Server error: {0}")]
    Server(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
