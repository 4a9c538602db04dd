//! Guided conversation loop
//!
//! The loop only sees a line-oriented [`Terminal`], so the CLI can drive it
//! from stdin and tests can drive it from a script.

use std::io;

use crate::error::Result;
use crate::note::{ConversationMessage, Role};
use crate::oracle::Oracle;

/// Token budget for a follow-up question
pub const FOLLOW_UP_MAX_TOKENS: u32 = 300;

/// Word that ends a conversation early
pub const DONE_WORD: &str = "done";

/// One read from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Eof,
    Interrupted,
}

/// Line-oriented user interaction
pub trait Terminal {
    /// Prompt for and read one line of input
    fn read_line(&mut self, prompt: &str) -> io::Result<Input>;

    /// Show an assistant turn
    fn say(&mut self, speaker: &str, text: &str) -> io::Result<()>;

    /// Show a status line
    fn status(&mut self, text: &str) -> io::Result<()>;
}

/// Fixed text that shapes one kind of conversation
#[derive(Debug, Clone)]
pub struct Script {
    /// Label shown before assistant turns
    pub speaker: String,
    pub system_prompt: String,
    pub opening_question: String,
    /// Shown when the user types `done`
    pub done_message: String,
    /// Shown when the round limit is reached
    pub wrap_up_message: String,
}

/// Run a conversation and return the full transcript, opening question included.
///
/// Ends on EOF or interrupt, on `done`, after `max_rounds` user turns, or when
/// the oracle fails. Blank input still uses up a round.
#[tracing::instrument(skip_all, fields(max_rounds = max_rounds))]
pub fn run_conversation(
    oracle: &dyn Oracle,
    terminal: &mut dyn Terminal,
    script: &Script,
    max_rounds: u32,
) -> Result<Vec<ConversationMessage>> {
    let mut transcript = vec![ConversationMessage::assistant(&script.opening_question)];
    // The opening question is not sent; the exchange starts with the user
    let mut exchange: Vec<ConversationMessage> = Vec::new();

    terminal.say(&script.speaker, &script.opening_question)?;

    for round in 0..max_rounds {
        let line = match terminal.read_line("You: ")? {
            Input::Line(line) => line,
            Input::Eof | Input::Interrupted => {
                terminal.status("Session ended.")?;
                break;
            }
        };

        let answer = line.trim();
        if answer.is_empty() {
            continue;
        }
        if answer.eq_ignore_ascii_case(DONE_WORD) {
            terminal.status(&script.done_message)?;
            break;
        }

        let turn = ConversationMessage::user(answer);
        transcript.push(turn.clone());
        exchange.push(turn);

        if round + 1 == max_rounds {
            terminal.status(&script.wrap_up_message)?;
            break;
        }

        let follow_up =
            match oracle.complete(&script.system_prompt, &exchange, FOLLOW_UP_MAX_TOKENS) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "follow-up question failed");
                    terminal.status("Could not reach the assistant, wrapping up.")?;
                    break;
                }
            };

        let turn = ConversationMessage::assistant(follow_up);
        terminal.say(&script.speaker, &turn.content)?;
        transcript.push(turn.clone());
        exchange.push(turn);
    }

    Ok(transcript)
}

/// True when the transcript holds at least one user turn
pub fn has_user_input(transcript: &[ConversationMessage]) -> bool {
    transcript.iter().any(|m| m.role == Role::User)
}
