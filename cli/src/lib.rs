//! # Bunny
//!
//! File: cli/src/lib.rs
//!
//! A small rule-based supportive chat companion. The library exposes the
//! response engine (`engine`), the shared infrastructure (`core`) and the
//! command handlers used by the `bunny` binary (`commands`).
//!
pub mod commands;
pub mod core;
pub mod engine;
