//! # Chat Loop
//!
//! File: cli/src/commands/chat/repl.rs
//!
//! ## Overview
//!
//! The line-oriented conversation loop behind `bunny chat`. It is written
//! against `BufRead`/`Write` rather than the real terminal so tests can feed
//! it a script and inspect the transcript.
//!
//! ## Flow
//!
//! 1. Print the opening line (the engine's reply to an empty input).
//! 2. Print `You: ` and read a line. End of input stops the loop.
//! 3. If the raw line, lowercased, is an exit word: print the exit message, stop.
//! 4. Otherwise ask the engine. An empty reply stops the loop silently.
//! 5. Print `<bot name>: <reply>` and repeat.
//!
use crate::core::config::ChatConfig;
use crate::core::error::{BunnyError, Result};
use crate::engine::{ResponseEngine, Session};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// How a chat loop finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEnd {
    /// The user typed one of the exit words.
    ExitWord,
    /// The engine returned the empty end-of-conversation reply.
    Ended,
    /// Input was exhausted.
    EndOfInput,
}

/// Result of one chat loop run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub turns: usize,
    pub end: ChatEnd,
    pub session: Session,
}

/// Exit words are compared against the raw line, only lowercased.
fn is_exit_word(line: &str, exit_words: &[String]) -> bool {
    let lowered = line.to_lowercase();
    exit_words.iter().any(|word| *word == lowered)
}

pub fn run_chat<R: BufRead, W: Write>(
    engine: &ResponseEngine,
    settings: &ChatConfig,
    mut input: R,
    mut output: W,
) -> Result<ChatSummary> {
    let mut session = Session::new();
    let opening = engine.respond(&mut session, "");
    writeln!(output, "{}", opening).map_err(BunnyError::from)?;

    let mut turns = 0;
    let end = loop {
        write!(output, "You: ").map_err(BunnyError::from)?;
        output.flush().map_err(BunnyError::from)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(BunnyError::from)? == 0 {
            // Keep the transcript tidy after the dangling prompt.
            writeln!(output).map_err(BunnyError::from)?;
            break ChatEnd::EndOfInput;
        }
        let line = line.trim_end_matches(&['\n', '\r'][..]);

        if is_exit_word(line, &settings.exit_words) {
            writeln!(output, "{}: {}", settings.bot_name, settings.exit_message)
                .map_err(BunnyError::from)?;
            break ChatEnd::ExitWord;
        }

        turns += 1;
        let reply = engine.respond(&mut session, line);
        debug!("Turn {} now in state {}", turns, session.state());
        if reply.is_empty() {
            break ChatEnd::Ended;
        }
        writeln!(output, "{}: {}", settings.bot_name, reply).map_err(BunnyError::from)?;
    };

    info!("Chat finished after {} turns ({:?})", turns, end);
    Ok(ChatSummary {
        turns,
        end,
        session,
    })
}
