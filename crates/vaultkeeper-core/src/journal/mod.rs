//! Journal capture: a guided reflection synthesized into a dated note

pub mod prompts;
mod synthesize;

pub use synthesize::{synthesize_note, MAX_TITLES_IN_PROMPT, SYNTHESIZE_MAX_TOKENS, TITLE_MAX_TOKENS};

use crate::dialogue::Script;
use crate::note::ReflectionType;

/// Conversation script for a reflection of the given type
pub fn script(reflection_type: ReflectionType) -> Script {
    Script {
        speaker: prompts::SPEAKER.to_string(),
        system_prompt: prompts::SYSTEM_PROMPT.to_string(),
        opening_question: prompts::opening_question(reflection_type).to_string(),
        done_message: prompts::DONE_MESSAGE.to_string(),
        wrap_up_message: prompts::WRAP_UP_MESSAGE.to_string(),
    }
}
