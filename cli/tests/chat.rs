//! # Bunny CLI Chat Integration Tests
//!
//! File: cli/tests/chat.rs
//!
//! ## Overview
//!
//! Drives `bunny chat` through standard input and checks the transcript.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_chat_anxiety_then_exit_word() {
    let (_config, mut cmd) = bunny_cmd();
    cmd.arg("chat")
        .write_stdin("I feel anxious today\nbye\n")
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("Hi! I’m Bunny, your therapist in your phone!")
                .and(predicate::str::contains(
                    "Bunny: I hear you. I hear you. Anxiety can feel overwhelming",
                ))
                .and(predicate::str::contains(
                    "Bunny: Take care! I'm always here if you need me. 🐰💖",
                )),
        );
}

#[test]
fn test_chat_closing_phrase_ends_silently() {
    let (_config, mut cmd) = bunny_cmd();
    cmd.arg("chat")
        .write_stdin("hello\ntake care\nI feel sad\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Bunny: Hi there! 😊 How can I assist you today?")
                .and(predicate::str::contains("You’re not alone").not())
                .and(predicate::str::contains("I'm always here if you need me").not()),
        );
}

#[test]
fn test_chat_journaling_and_fallback() {
    let (_config, mut cmd) = bunny_cmd();
    cmd.arg("chat")
        .write_stdin(
            "the weather\n\
             one two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen sixteen seventeen eighteen nineteen twenty twentyone\n",
        )
        .assert()
        .success()
        .stdout(
            predicate::str::contains(
                "Bunny: I'm glad we talked. Is there anything else on your mind before we wrap up? 💬",
            )
            .and(predicate::str::contains(
                "Bunny: That was lovely of you to share.",
            )),
        );
}

#[test]
fn test_chat_name_flag() {
    let (_config, mut cmd) = bunny_cmd();
    cmd.args(["chat", "--name", "Clover"])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("Hi! I’m Clover,")
                .and(predicate::str::contains("Clover: Take care!")),
        );
}

#[test]
fn test_chat_exit_words_from_config() {
    let config = TestConfig::new("[chat]\nexit_words = [\"enough\"]\nexit_message = \"See you soon.\"\n");
    config
        .cmd()
        .arg("chat")
        .write_stdin("quit\nENOUGH\n")
        .assert()
        .success()
        .stdout(
            // "quit" is no longer an exit word, so it reaches the engine.
            predicate::str::contains("Bunny: I'm glad we talked.")
                .and(predicate::str::contains("Bunny: See you soon.")),
        );
}

#[test]
fn test_chat_farewell_flag_recommends() {
    let (_config, mut cmd) = bunny_cmd();
    cmd.args(["chat", "--farewell"])
        .write_stdin("I am so stressed\nthe weather\nnope\ntake care\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Bunny: I’m really glad we got to chat today!").and(
                predicate::str::contains(
                    "Bunny: Before you go, here’s something that might bring you joy:",
                ),
            ),
        );
}

#[test]
fn test_chat_without_farewell_never_recommends() {
    let (_config, mut cmd) = bunny_cmd();
    cmd.arg("chat")
        .write_stdin("I am so stressed\nthe weather\nnope\ntake care\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Before you go").not());
}
