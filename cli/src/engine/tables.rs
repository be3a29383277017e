//! # Keyword and Response Tables
//!
//! File: cli/src/engine/tables.rs
//!
//! ## Overview
//!
//! The tables are the whole "knowledge" of the responder: which phrases count
//! as greetings, closings and exit triggers, which keywords signal which
//! emotion, and what to say or recommend for each emotion. They are built once
//! (either from the built-in set or from a TOML file) and never change
//! afterwards; the engine only reads them.
//!
//! ## Ordering
//!
//! `emotions` is a `Vec`, not a map. Emotion detection walks it front to back
//! and the first entry with a matching keyword wins, so the order is part of
//! the behavior (e.g. "lost" is listed under both depression and confusion,
//! and depression comes first).
//!
//! ## File format
//!
//! ```toml
//! greetings = ["hi", "hello"]
//! closings = ["bye"]
//! exit_triggers = ["no"]
//!
//! [[emotions]]
//! name = "anxiety"
//! keywords = ["anxious", "nervous"]
//! advice = "Try a slow breath in, and a slower breath out."
//! recommendations = ["Song: 'Weightless' by Marconi Union 🎵"]
//! ```
//!
use crate::core::error::{BunnyError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const GENERIC_ADVICE: &str = "Your feelings are valid. Let’s talk about what might help. 💛";
const DEFAULT_RECOMMENDATION: &str = "A nice walk outside might help. 🌿";

/// One emotion: its trigger keywords and what to say about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmotionEntry {
    pub name: String,
    pub keywords: Vec<String>,
    /// Canned advice. Emotions without one get the generic validating message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl EmotionEntry {
    /// True when any keyword occurs as a substring of `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }
}

/// The complete set of lookup tables used by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tables {
    pub greetings: Vec<String>,
    pub closings: Vec<String>,
    pub exit_triggers: Vec<String>,
    #[serde(default = "default_generic_advice")]
    pub generic_advice: String,
    #[serde(default = "default_recommendation")]
    pub default_recommendation: String,
    pub emotions: Vec<EmotionEntry>,
}

fn default_generic_advice() -> String {
    GENERIC_ADVICE.to_string()
}
fn default_recommendation() -> String {
    DEFAULT_RECOMMENDATION.to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn emotion(name: &str, keywords: &[&str], advice: Option<&str>, recommendations: &[&str]) -> EmotionEntry {
    EmotionEntry {
        name: name.to_string(),
        keywords: strings(keywords),
        advice: advice.map(str::to_string),
        recommendations: strings(recommendations),
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Tables {
    /// The tables Bunny ships with.
    pub fn builtin() -> Self {
        Self {
            greetings: strings(&["hi", "hello", "hey", "what's up"]),
            closings: strings(&[
                "bye",
                "goodbye",
                "you too",
                "thanks, you too",
                "take care",
                "i'm done, bye",
            ]),
            exit_triggers: strings(&[
                "no",
                "nothing else",
                "that's all",
                "i'm good now",
                "all done",
                "nope",
            ]),
            generic_advice: default_generic_advice(),
            default_recommendation: default_recommendation(),
            emotions: vec![
                emotion(
                    "happy",
                    &["happy", "great", "good", "excited", "joyful", "fantastic", "amazing", "wonderful"],
                    None,
                    &[],
                ),
                emotion(
                    "neutral",
                    &["okay", "alright", "fine", "not sure", "i don't know", "maybe"],
                    None,
                    &[],
                ),
                emotion(
                    "anxiety",
                    &["anxious", "nervous", "worried", "overwhelmed", "uneasy"],
                    Some("I hear you. Anxiety can feel overwhelming, but it’s temporary. Try this breathing exercise: [https://www.healthline.com/health/deep-breathing] 🌿"),
                    &[
                        "Song: 'Weightless' by Marconi Union 🎵",
                        "Movie: 'Inside Out' (2015) 🎬",
                        "Art: 'The Starry Night' by Vincent van Gogh 🎨",
                    ],
                ),
                emotion(
                    "stress",
                    &["stressed", "burned out", "exhausted", "frustrated", "pressured"],
                    Some("Stress can be heavy, but breaking things into small steps helps. Here’s something useful: [https://www.apa.org/topics/stress] ✨"),
                    &[
                        "Song: 'Clair de Lune' by Debussy 🎶",
                        "Movie: 'The Secret Life of Walter Mitty' (2013) 🎥",
                        "Art: 'Water Lilies' by Monet 🌿",
                    ],
                ),
                emotion(
                    "depression",
                    &["depressed", "sad", "down", "hopeless", "lost"],
                    Some("You’re not alone. Talking about feelings is a great step. More resources here: [https://www.nimh.nih.gov/health/topics/depression] 💙"),
                    &[
                        "Song: 'Here Comes the Sun' by The Beatles ☀️",
                        "Movie: 'Soul' (2020) 🎬",
                        "Art: 'Girl with a Pearl Earring' by Vermeer 💎",
                    ],
                ),
                emotion(
                    "loneliness",
                    &["lonely", "alone", "isolated", "disconnected"],
                    Some("Feeling lonely is hard, but even small connections can help. Maybe reach out to someone or try journaling. 💞"),
                    &[
                        "Song: 'Lean on Me' by Bill Withers 🎶",
                        "Movie: 'Cast Away' (2000) 🎬",
                        "Art: 'The Lovers' by René Magritte 💞",
                    ],
                ),
                emotion(
                    "confusion",
                    &["confused", "unsure", "uncertain", "lost"],
                    Some("Uncertainty can be part of growth. Let’s process this together. What’s been on your mind? 🌀"),
                    &[
                        "Song: 'Lost Stars' by Adam Levine 🎵",
                        "Movie: 'Eternal Sunshine of the Spotless Mind' (2004) 🎬",
                        "Art: 'The Persistence of Memory' by Salvador Dalí 🌀",
                    ],
                ),
                emotion(
                    "hopeful",
                    &["hopeful", "optimistic", "relieved", "grateful"],
                    Some("Hope is powerful! I love that you’re holding onto it. What’s something exciting coming up? 🌟"),
                    &[
                        "Song: 'Don't Stop Believin'' by Journey 🌈",
                        "Movie: 'The Pursuit of Happyness' (2006) 🎬",
                        "Art: 'Impression, Sunrise' by Claude Monet 🌅",
                    ],
                ),
            ],
        }
    }

    /// Parses, normalizes and validates tables from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut tables: Tables = toml::from_str(content).context("Failed to parse tables TOML")?;
        tables.normalize();
        tables.validate()?;
        Ok(tables)
    }

    /// Loads a custom tables file.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading response tables from: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tables file: {}", path.display()))?;
        let tables = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid tables file: {}", path.display()))?;
        debug!(
            "Loaded {} emotions, {} greetings, {} closings",
            tables.emotions.len(),
            tables.greetings.len(),
            tables.closings.len()
        );
        Ok(tables)
    }

    /// Phrases and keywords are compared against lowercased, trimmed input,
    /// so they are stored the same way.
    fn normalize(&mut self) {
        let fold = |items: &mut Vec<String>| {
            for item in items.iter_mut() {
                *item = item.trim().to_lowercase();
            }
        };
        fold(&mut self.greetings);
        fold(&mut self.closings);
        fold(&mut self.exit_triggers);
        for entry in &mut self.emotions {
            entry.name = entry.name.trim().to_string();
            fold(&mut entry.keywords);
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.emotions {
            if entry.name.is_empty() {
                return Err(BunnyError::Tables("Emotion names cannot be empty.".into()).into());
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(BunnyError::Tables(format!(
                    "Emotion '{}' is listed more than once.",
                    entry.name
                ))
                .into());
            }
            if entry.keywords.is_empty() {
                return Err(BunnyError::Tables(format!(
                    "Emotion '{}' has no keywords.",
                    entry.name
                ))
                .into());
            }
            // An empty keyword is a substring of everything.
            if entry.keywords.iter().any(String::is_empty) {
                return Err(BunnyError::Tables(format!(
                    "Emotion '{}' has an empty keyword.",
                    entry.name
                ))
                .into());
            }
        }
        Ok(())
    }

    pub fn is_greeting(&self, text: &str) -> bool {
        self.greetings.iter().any(|phrase| phrase == text)
    }

    pub fn is_closing(&self, text: &str) -> bool {
        self.closings.iter().any(|phrase| phrase == text)
    }

    pub fn is_exit_trigger(&self, text: &str) -> bool {
        self.exit_triggers.iter().any(|phrase| phrase == text)
    }

    /// First emotion, in table order, with a keyword inside `text`.
    pub fn detect_emotion(&self, text: &str) -> Option<&EmotionEntry> {
        self.emotions.iter().find(|entry| entry.matches(text))
    }

    pub fn emotion(&self, name: &str) -> Option<&EmotionEntry> {
        self.emotions.iter().find(|entry| entry.name == name)
    }

    pub fn advice_for<'a>(&'a self, entry: &'a EmotionEntry) -> &'a str {
        entry.advice.as_deref().unwrap_or(&self.generic_advice)
    }

    /// Recommendation pool for a remembered emotion; `None` means use the default.
    pub fn recommendations_for(&self, emotion: Option<&str>) -> Option<&[String]> {
        emotion
            .and_then(|name| self.emotion(name))
            .map(|entry| entry.recommendations.as_slice())
            .filter(|pool| !pool.is_empty())
    }
}
