//! Text-completion oracle
//!
//! Everything that asks a language model goes through [`Oracle`], so the
//! engines can be driven by a scripted implementation in tests.

mod anthropic;

pub use anthropic::{AnthropicOracle, ANTHROPIC_API_URL, ANTHROPIC_VERSION};

use crate::error::Result;
use crate::note::ConversationMessage;

/// Token budget for single-shot analysis requests
pub const ANALYZE_MAX_TOKENS: u32 = 1500;

/// A blocking text-completion service
pub trait Oracle {
    /// Complete a conversation under a system prompt
    fn complete(
        &self,
        system: &str,
        messages: &[ConversationMessage],
        max_tokens: u32,
    ) -> Result<String>;

    /// Single-shot question with the analysis token budget
    fn ask(&self, system: &str, user: &str) -> Result<String> {
        self.complete(
            system,
            &[ConversationMessage::user(user)],
            ANALYZE_MAX_TOKENS,
        )
    }
}

impl<T: Oracle + ?Sized> Oracle for &T {
    fn complete(
        &self,
        system: &str,
        messages: &[ConversationMessage],
        max_tokens: u32,
    ) -> Result<String> {
        (**self).complete(system, messages, max_tokens)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::Oracle;
    use crate::error::{Result, VaultError};
    use crate::note::ConversationMessage;

    /// One recorded oracle request
    #[derive(Debug, Clone)]
    pub(crate) struct Call {
        pub system: String,
        pub messages: Vec<ConversationMessage>,
        pub max_tokens: u32,
    }

    /// Oracle that replays canned replies in order and records every call.
    ///
    /// `None` entries simulate a failed request; an exhausted script fails too.
    #[derive(Default)]
    pub(crate) struct ScriptedOracle {
        replies: RefCell<VecDeque<Option<String>>>,
        calls: RefCell<Vec<Call>>,
    }

    impl ScriptedOracle {
        pub(crate) fn new<I, S>(replies: I) -> Self
        where
            I: IntoIterator<Item = Option<S>>,
            S: Into<String>,
        {
            ScriptedOracle {
                replies: RefCell::new(replies.into_iter().map(|r| r.map(Into::into)).collect()),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn replying<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
            Self::new(replies.into_iter().map(Some))
        }

        pub(crate) fn failing() -> Self {
            Self::default()
        }

        pub(crate) fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl Oracle for ScriptedOracle {
        fn complete(
            &self,
            system: &str,
            messages: &[ConversationMessage],
            max_tokens: u32,
        ) -> Result<String> {
            self.calls.borrow_mut().push(Call {
                system: system.to_string(),
                messages: messages.to_vec(),
                max_tokens,
            });
            self.replies
                .borrow_mut()
                .pop_front()
                .flatten()
                .ok_or_else(|| VaultError::oracle("scripted failure"))
        }
    }
}
