//! # Response Engine
//!
//! File: cli/src/engine/responder.rs
//!
//! ## Overview
//!
//! `ResponseEngine::respond` maps one line of user text to one reply and
//! advances the caller's `Session`. Rules are checked in a fixed priority
//! order and the first rule that applies produces the reply:
//!
//! 1. closing phrase (exact) → `""`, the end-of-conversation sentinel
//! 2. greeting phrase (exact) → greeting reply
//! 3. session still in `Intro` → introduction
//! 4. emotion keyword (substring, table order) → advice
//! 5. more than 20 words → journaling acknowledgment
//! 6. anything else → "anything else?" prompt
//!
//! Rules 5 and 6 both move the session to `ClosingPrompt`, and rule 6 always
//! answers, so nothing after it can run. The exit-trigger step
//! (`ClosingPrompt` → `FinalGoodbye`) and the farewell recommendation are
//! therefore never reached by default. They are only wired in when the
//! engine is built with `with_farewell_path(true)`, which checks them at
//! these points instead:
//!
//! - before rule 1: `FinalGoodbye` + closing phrase → farewell recommendation
//! - between rules 3 and 4: `ClosingPrompt` + exit trigger → final goodbye
//!
//! The exit-trigger check has to come before emotion detection because
//! "i'm good now" contains the happy keyword "good".
//!
use super::session::{ConversationState, MemoryKey, Session};
use super::tables::Tables;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

pub const GREETING_REPLY: &str = "Hi there! 😊 How can I assist you today?";
pub const JOURNALING_ACK: &str = "That was lovely of you to share. Thank you for opening up. Expressing yourself like this helps process emotions. Is there anything else on your mind? 💬";
pub const ANYTHING_ELSE_PROMPT: &str =
    "I'm glad we talked. Is there anything else on your mind before we wrap up? 💬";
pub const FINAL_GOODBYE: &str = "I’m really glad we got to chat today! 💛 Remember, you matter. I’m always here if you need me. Take care! 🐰✨";

const ADVICE_PREFIX: &str = "I hear you. ";
const JOURNALING_MIN_WORDS: usize = 21;
const DEFAULT_BOT_NAME: &str = "Bunny";

/// Lowercases and trims raw user input.
pub fn normalize(raw_text: &str) -> String {
    raw_text.trim().to_lowercase()
}

/// Rule-based responder over a fixed set of tables.
///
/// The engine is immutable once built and can be shared between any number of
/// sessions (wrap it in an `Arc` to share across threads).
#[derive(Debug, Clone)]
pub struct ResponseEngine {
    tables: Tables,
    bot_name: String,
    farewell_path: bool,
}

impl Default for ResponseEngine {
    fn default() -> Self {
        Self::new(Tables::builtin())
    }
}

impl ResponseEngine {
    pub fn new(tables: Tables) -> Self {
        Self {
            tables,
            bot_name: DEFAULT_BOT_NAME.to_string(),
            farewell_path: false,
        }
    }

    /// Name the bot introduces itself with.
    pub fn with_bot_name(mut self, name: impl Into<String>) -> Self {
        self.bot_name = name.into();
        self
    }

    /// Enables the exit-trigger and farewell recommendation steps.
    pub fn with_farewell_path(mut self, enabled: bool) -> Self {
        self.farewell_path = enabled;
        self
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    pub fn farewell_path(&self) -> bool {
        self.farewell_path
    }

    pub fn intro_prompt(&self) -> String {
        format!(
            "Hi! I’m {}, your therapist in your phone! 🌸 How would you say you’re feeling today? 😊",
            self.bot_name
        )
    }

    /// Produces the reply to `raw_text` and advances `session`.
    ///
    /// An empty reply means the conversation is over.
    pub fn respond(&self, session: &mut Session, raw_text: &str) -> String {
        self.respond_with_rng(session, raw_text, &mut rand::thread_rng())
    }

    /// Same as [`respond`](Self::respond) with an explicit random source for
    /// the farewell recommendation.
    pub fn respond_with_rng<R: Rng + ?Sized>(
        &self,
        session: &mut Session,
        raw_text: &str,
        rng: &mut R,
    ) -> String {
        let text = normalize(raw_text);

        // Farewell path only: a closing phrase after the final goodbye earns a
        // recommendation instead of the silent end.
        if self.farewell_path
            && session.state() == ConversationState::FinalGoodbye
            && self.tables.is_closing(&text)
        {
            return self.recommend(session, rng);
        }

        // Closings end the conversation from any stage.
        if self.tables.is_closing(&text) {
            debug!("Closing phrase '{}', ending conversation", text);
            return String::new();
        }

        // Greetings are answered without moving the conversation along.
        if self.tables.is_greeting(&text) {
            debug!("Greeting phrase '{}'", text);
            return GREETING_REPLY.to_string();
        }

        // The first real turn always gets the introduction, whatever it says.
        if session.state() == ConversationState::Intro {
            self.transition(session, ConversationState::WaitingForFeeling);
            return self.intro_prompt();
        }

        if self.farewell_path
            && session.state() == ConversationState::ClosingPrompt
            && self.tables.is_exit_trigger(&text)
        {
            self.transition(session, ConversationState::FinalGoodbye);
            return FINAL_GOODBYE.to_string();
        }

        // First emotion in table order wins.
        if let Some(entry) = self.tables.detect_emotion(&text) {
            debug!("Detected emotion '{}'", entry.name);
            session.remember(MemoryKey::Emotion, entry.name.as_str());
            self.transition(session, ConversationState::ProvidingAdvice);
            return format!("{}{}", ADVICE_PREFIX, self.tables.advice_for(entry));
        }

        // Nothing matched: acknowledge long messages as journaling.
        self.transition(session, ConversationState::ClosingPrompt);
        if text.split_whitespace().count() >= JOURNALING_MIN_WORDS {
            JOURNALING_ACK.to_string()
        } else {
            ANYTHING_ELSE_PROMPT.to_string()
        }
    }

    fn recommend<R: Rng + ?Sized>(&self, session: &Session, rng: &mut R) -> String {
        let emotion = session.emotion();
        let recommendation = self
            .tables
            .recommendations_for(emotion)
            .and_then(|pool| pool.choose(rng))
            .unwrap_or(&self.tables.default_recommendation);
        debug!(
            "Farewell recommendation for {:?}: {}",
            emotion, recommendation
        );
        format!(
            "Before you go, here’s something that might bring you joy: {} \nTake care! 🐰✨",
            recommendation
        )
    }

    fn transition(&self, session: &mut Session, next: ConversationState) {
        debug!("Conversation state {} -> {}", session.state(), next);
        session.set_state(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Session already past the introduction.
    fn engaged(engine: &ResponseEngine) -> Session {
        let mut session = Session::new();
        engine.respond(&mut session, "");
        assert_eq!(session.state(), ConversationState::WaitingForFeeling);
        session
    }

    fn advice(text: &str) -> String {
        format!("{}{}", ADVICE_PREFIX, text)
    }

    #[test]
    fn test_closing_returns_empty_without_state_change() {
        let engine = ResponseEngine::default();
        for phrase in ["bye", "  GoodBye ", "Thanks, you too", "i'm done, bye"] {
            let mut session = Session::new();
            assert_eq!(engine.respond(&mut session, phrase), "");
            assert_eq!(session, Session::new());
        }
    }

    #[test]
    fn test_closing_is_idempotent_from_every_state() {
        let engine = ResponseEngine::default();
        let mut session = engaged(&engine);
        engine.respond(&mut session, "I feel so stressed");
        assert_eq!(session.state(), ConversationState::ProvidingAdvice);
        let before = session.clone();

        assert_eq!(engine.respond(&mut session, "take care"), "");
        assert_eq!(engine.respond(&mut session, "take care"), "");
        assert_eq!(session, before);
    }

    #[test]
    fn test_greeting_returns_fixed_reply_without_state_change() {
        let engine = ResponseEngine::default();
        let mut session = Session::new();
        assert_eq!(engine.respond(&mut session, "HELLO"), GREETING_REPLY);
        assert_eq!(engine.respond(&mut session, " what's up "), GREETING_REPLY);
        assert_eq!(session.state(), ConversationState::Intro);
    }

    #[test]
    fn test_intro_ignores_content() {
        let engine = ResponseEngine::default();
        let mut session = Session::new();
        // Even an emotion keyword gets the introduction first.
        let reply = engine.respond(&mut session, "I am so anxious");
        assert_eq!(reply, engine.intro_prompt());
        assert_eq!(session.state(), ConversationState::WaitingForFeeling);
        assert_eq!(session.emotion(), None);
    }

    #[test]
    fn test_intro_text() {
        let engine = ResponseEngine::default();
        assert_eq!(
            engine.intro_prompt(),
            "Hi! I’m Bunny, your therapist in your phone! 🌸 How would you say you’re feeling today? 😊"
        );
        let named = ResponseEngine::default().with_bot_name("Clover");
        assert!(named.intro_prompt().starts_with("Hi! I’m Clover,"));
    }

    #[test]
    fn test_anxiety_detection() {
        let engine = ResponseEngine::default();
        let mut session = engaged(&engine);
        let reply = engine.respond(&mut session, "I feel anxious today");
        assert_eq!(
            reply,
            "I hear you. I hear you. Anxiety can feel overwhelming, but it’s temporary. Try this breathing exercise: [https://www.healthline.com/health/deep-breathing] 🌿"
        );
        assert_eq!(session.emotion(), Some("anxiety"));
        assert_eq!(session.state(), ConversationState::ProvidingAdvice);
    }

    #[test]
    fn test_emotion_without_canned_text_gets_generic_advice() {
        let engine = ResponseEngine::default();
        let mut session = engaged(&engine);
        let reply = engine.respond(&mut session, "Today was fantastic");
        assert_eq!(
            reply,
            advice("Your feelings are valid. Let’s talk about what might help. 💛")
        );
        assert_eq!(session.emotion(), Some("happy"));
    }

    #[test]
    fn test_table_order_breaks_ties() {
        let engine = ResponseEngine::default();
        let mut session = engaged(&engine);
        // "good" is happy, "not sure" is neutral: happy is listed first.
        engine.respond(&mut session, "good, but not sure");
        assert_eq!(session.emotion(), Some("happy"));

        // "lost" is both depression and confusion: depression is listed first.
        let reply = engine.respond(&mut session, "i'm lost");
        assert_eq!(session.emotion(), Some("depression"));
        assert!(reply.contains("You’re not alone."));
    }

    #[test]
    fn test_long_input_is_journaling() {
        let engine = ResponseEngine::default();
        let mut session = engaged(&engine);
        let entry = "today i walked to the park and sat by the pond watching the ducks \
                     for a while then i went home and made some tea before bed";
        assert!(entry.split_whitespace().count() > 20);
        assert_eq!(engine.respond(&mut session, entry), JOURNALING_ACK);
        assert_eq!(session.state(), ConversationState::ClosingPrompt);
        assert_eq!(session.emotion(), None);
    }

    #[test]
    fn test_exactly_twenty_words_is_not_journaling() {
        let engine = ResponseEngine::default();
        let mut session = engaged(&engine);
        let entry = vec!["tea"; 20].join(" ");
        assert_eq!(engine.respond(&mut session, &entry), ANYTHING_ELSE_PROMPT);
    }

    #[test]
    fn test_unmatched_input_falls_back() {
        let engine = ResponseEngine::default();
        let mut session = engaged(&engine);
        assert_eq!(engine.respond(&mut session, "the weather"), ANYTHING_ELSE_PROMPT);
        assert_eq!(session.state(), ConversationState::ClosingPrompt);
        // Empty input after the intro is just another unmatched input.
        assert_eq!(engine.respond(&mut session, "   "), ANYTHING_ELSE_PROMPT);
    }

    #[test]
    fn test_exit_trigger_unreachable_by_default() {
        let engine = ResponseEngine::default();
        let mut session = engaged(&engine);
        engine.respond(&mut session, "the weather");
        assert_eq!(session.state(), ConversationState::ClosingPrompt);

        assert_eq!(engine.respond(&mut session, "nope"), ANYTHING_ELSE_PROMPT);
        assert_eq!(session.state(), ConversationState::ClosingPrompt);
        // "i'm good now" is caught by the happy keyword instead.
        engine.respond(&mut session, "i'm good now");
        assert_eq!(session.state(), ConversationState::ProvidingAdvice);
        assert_eq!(session.emotion(), Some("happy"));
    }

    #[test]
    fn test_farewell_path_goodbye_then_recommendation() {
        let engine = ResponseEngine::default().with_farewell_path(true);
        let mut session = engaged(&engine);
        engine.respond(&mut session, "I feel anxious");
        engine.respond(&mut session, "the weather");
        assert_eq!(session.state(), ConversationState::ClosingPrompt);

        assert_eq!(engine.respond(&mut session, "i'm good now"), FINAL_GOODBYE);
        assert_eq!(session.state(), ConversationState::FinalGoodbye);

        // StepRng(0, 0) always yields zero, so the first entry is chosen.
        let mut rng = StepRng::new(0, 0);
        let reply = engine.respond_with_rng(&mut session, "bye", &mut rng);
        assert_eq!(
            reply,
            "Before you go, here’s something that might bring you joy: Song: 'Weightless' by Marconi Union 🎵 \nTake care! 🐰✨"
        );
        assert_eq!(session.state(), ConversationState::FinalGoodbye);
    }

    #[test]
    fn test_farewell_recommendation_comes_from_emotion_pool() {
        let engine = ResponseEngine::default().with_farewell_path(true);
        let mut rng = StdRng::seed_from_u64(7);
        let pool = engine
            .tables()
            .recommendations_for(Some("stress"))
            .unwrap()
            .to_vec();

        for _ in 0..10 {
            let mut session = engaged(&engine);
            engine.respond(&mut session, "so stressed");
            engine.respond(&mut session, "ok then");
            engine.respond(&mut session, "no");
            let reply = engine.respond_with_rng(&mut session, "goodbye", &mut rng);
            assert!(pool.iter().any(|rec| reply.contains(rec.as_str())), "{}", reply);
        }
    }

    #[test]
    fn test_farewell_without_emotion_uses_default() {
        let engine = ResponseEngine::default().with_farewell_path(true);
        let mut session = engaged(&engine);
        engine.respond(&mut session, "the weather");
        engine.respond(&mut session, "that's all");
        let reply = engine.respond_with_rng(&mut session, "bye", &mut StepRng::new(0, 0));
        assert!(reply.contains("A nice walk outside might help. 🌿"));
    }

    #[test]
    fn test_farewell_path_keeps_closing_sentinel_elsewhere() {
        let engine = ResponseEngine::default().with_farewell_path(true);
        let mut session = engaged(&engine);
        assert_eq!(engine.respond(&mut session, "bye"), "");
        assert_eq!(session.state(), ConversationState::WaitingForFeeling);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  I Feel FINE \n"), "i feel fine");
        assert_eq!(normalize(""), "");
    }
}
