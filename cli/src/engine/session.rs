//! # Conversation Session
//!
//! File: cli/src/engine/session.rs
//!
//! A `Session` is the only mutable piece of a conversation: the current stage
//! and a tiny memory of what the user has told us. One session belongs to one
//! conversation and is handed to every `respond` call.
//!
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Stage of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// Nothing has been said yet; the next unmatched input gets the introduction.
    #[default]
    Intro,
    WaitingForFeeling,
    ProvidingAdvice,
    ClosingPrompt,
    FinalGoodbye,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Intro => "intro",
            ConversationState::WaitingForFeeling => "waiting_for_feeling",
            ConversationState::ProvidingAdvice => "providing_advice",
            ConversationState::ClosingPrompt => "closing_prompt",
            ConversationState::FinalGoodbye => "final_goodbye",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys a session can remember.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryKey {
    Emotion,
}

/// Per-conversation state and memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    state: ConversationState,
    memory: HashMap<MemoryKey, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// The last emotion tag detected in this conversation, if any.
    pub fn emotion(&self) -> Option<&str> {
        self.recall(MemoryKey::Emotion)
    }

    pub fn recall(&self, key: MemoryKey) -> Option<&str> {
        self.memory.get(&key).map(String::as_str)
    }

    pub(crate) fn set_state(&mut self, state: ConversationState) {
        self.state = state;
    }

    pub(crate) fn remember(&mut self, key: MemoryKey, value: impl Into<String>) {
        self.memory.insert(key, value.into());
    }
}
