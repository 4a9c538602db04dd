use crate::error::VaultError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of a guided conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ConversationMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ConversationMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Render a transcript as `User: ...` / `Assistant: ...` paragraphs
pub fn format_transcript(messages: &[ConversationMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let speaker = match m.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{}: {}", speaker, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Kind of journal reflection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReflectionType {
    EndOfDay,
    EndOfProject,
    Podcast,
    Meeting,
    Reading,
    FreeForm,
}

impl ReflectionType {
    /// All reflection types in menu order
    pub const ALL: [ReflectionType; 6] = [
        ReflectionType::EndOfDay,
        ReflectionType::EndOfProject,
        ReflectionType::Podcast,
        ReflectionType::Meeting,
        ReflectionType::Reading,
        ReflectionType::FreeForm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReflectionType::EndOfDay => "end-of-day",
            ReflectionType::EndOfProject => "end-of-project",
            ReflectionType::Podcast => "podcast",
            ReflectionType::Meeting => "meeting",
            ReflectionType::Reading => "reading",
            ReflectionType::FreeForm => "free-form",
        }
    }
}

impl fmt::Display for ReflectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReflectionType {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ReflectionType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| {
                let supported: Vec<&str> = ReflectionType::ALL.iter().map(|t| t.as_str()).collect();
                VaultError::invalid_value(
                    "reflection type",
                    format!("{} (expected one of: {})", s, supported.join(", ")),
                )
            })
    }
}
