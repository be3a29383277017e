//! # Bunny Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates all top-level commands of the Bunny CLI so that
//! `main.rs` can route to them.
//!
//! ## Commands
//!
//! - `chat`: Interactive conversation in the terminal
//! - `serve`: HTTP adapter holding one session per conversation
//! - `tables`: Print the effective keyword and response tables
//!
//! Each command defines its own arguments structure and an async handler
//! taking those arguments plus the loaded configuration.
//!

/// Interactive terminal conversation. Includes the line-oriented chat loop.
pub mod chat;
/// HTTP adapter for the response engine. Includes configuration, handlers and server logic.
pub mod serve;
/// Prints the effective tables as TOML or as an emotion summary.
pub mod tables;
