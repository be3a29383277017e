//! # Bunny Response Engine
//!
//! File: cli/src/engine/mod.rs
//!
//! ## Overview
//!
//! The engine turns one line of user text into one reply. It is made of:
//! - `tables`: the immutable keyword and response tables
//! - `session`: the per-conversation state and memory
//! - `responder`: the `ResponseEngine` that applies the rules
//!
//! The engine never fails and never blocks. It holds no mutable state of its
//! own, so one engine can serve many sessions at once.
//!
//! ## Examples
//!
//! ```rust
//! use bunny::engine::{ResponseEngine, Session};
//!
//! let engine = ResponseEngine::default();
//! let mut session = Session::new();
//!
//! let intro = engine.respond(&mut session, "");
//! assert!(intro.starts_with("Hi! I’m Bunny"));
//!
//! let advice = engine.respond(&mut session, "I feel anxious today");
//! assert_eq!(session.emotion(), Some("anxiety"));
//! assert!(advice.contains("breathing exercise"));
//!
//! // An empty reply means the conversation is over.
//! assert_eq!(engine.respond(&mut session, "bye"), "");
//! ```
//!
pub mod responder;
pub mod session;
pub mod tables;

pub use responder::ResponseEngine;
pub use session::{ConversationState, MemoryKey, Session};
pub use tables::{EmotionEntry, Tables};

use crate::core::config::Config;
use crate::core::error::Result;
use std::path::Path;

/// Builds the engine described by `config`.
///
/// `farewell_override` turns the farewell path on even when the config
/// leaves it off (it never turns it off).
pub fn build_engine(config: &Config, farewell_override: bool) -> Result<ResponseEngine> {
    let tables = match &config.engine.tables_file {
        Some(path) => Tables::load(Path::new(path))?,
        None => Tables::builtin(),
    };
    Ok(ResponseEngine::new(tables)
        .with_bot_name(config.chat.bot_name.clone())
        .with_farewell_path(config.engine.farewell_enabled() || farewell_override))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_build_engine_defaults() {
        let engine = build_engine(&Config::default(), false).unwrap();
        assert!(!engine.farewell_path());
        assert_eq!(engine.bot_name(), "Bunny");
        assert_eq!(engine.tables(), &Tables::builtin());
    }

    #[test]
    fn test_build_engine_override_and_custom_tables() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("tables.toml");
        fs::write(
            &path,
            "greetings = [\"ahoy\"]\nclosings = [\"farewell\"]\nexit_triggers = []\n\n[[emotions]]\nname = \"sleepy\"\nkeywords = [\"tired\"]\n",
        )
        .unwrap();

        let config = Config {
            engine: EngineConfig {
                tables_file: Some(path.to_string_lossy().to_string()),
                farewell_path: Some(false),
            },
            ..Default::default()
        };
        let engine = build_engine(&config, true).unwrap();
        assert!(engine.farewell_path());

        let mut session = Session::new();
        assert_eq!(engine.respond(&mut session, "Ahoy"), responder::GREETING_REPLY);
        assert_eq!(engine.respond(&mut session, "farewell"), "");
        engine.respond(&mut session, "");
        engine.respond(&mut session, "so tired");
        assert_eq!(session.emotion(), Some("sleepy"));
    }
}
