use std::collections::HashSet;

use chrono::NaiveDate;

use super::prompts::{SYNTHESIZE_SYSTEM, TITLE_SYSTEM};
use crate::error::Result;
use crate::note::{format_transcript, ConversationMessage, Frontmatter, Note, ReflectionType};
use crate::text::{sanitize_filename, wikilink_targets};

pub const SYNTHESIZE_MAX_TOKENS: u32 = 2000;
pub const TITLE_MAX_TOKENS: u32 = 50;

/// Existing titles offered to the synthesizer for linking
pub const MAX_TITLES_IN_PROMPT: usize = 200;

/// Turn a reflection transcript into a journal note dated `today`
#[tracing::instrument(skip(oracle, transcript, existing_titles), fields(turns = transcript.len()))]
pub fn synthesize_note(
    oracle: &dyn crate::oracle::Oracle,
    transcript: &[ConversationMessage],
    reflection_type: ReflectionType,
    existing_titles: &[String],
    today: NaiveDate,
    journal_folder: &str,
) -> Result<Note> {
    let conversation = format_transcript(transcript);
    let offered = existing_titles
        .iter()
        .take(MAX_TITLES_IN_PROMPT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let body_request = format!(
        "Conversation transcript:\n\n{}\n\nExisting note titles in vault: {}\n\nReflection type: {}",
        conversation, offered, reflection_type
    );
    let body = oracle
        .complete(
            SYNTHESIZE_SYSTEM,
            &[ConversationMessage::user(body_request)],
            SYNTHESIZE_MAX_TOKENS,
        )?
        .trim()
        .to_string();

    let raw_title = oracle.complete(
        TITLE_SYSTEM,
        &[ConversationMessage::user(format!(
            "Conversation:\n\n{}",
            conversation
        ))],
        TITLE_MAX_TOKENS,
    )?;
    let title = clean_title(&raw_title).unwrap_or_else(|| format!("{} reflection", reflection_type));

    let date = today.format("%Y-%m-%d").to_string();
    let frontmatter = Frontmatter::dated(&date)
        .with_type(reflection_type.as_str())
        .with_tags([format!("journal/{}", reflection_type)])
        .with_related(related_titles(&body, existing_titles));

    Ok(Note::new(format!("{} {}", date, title), body)
        .with_folder(journal_folder)
        .with_frontmatter(frontmatter))
}

/// Single-line, filename-safe title; `None` when nothing usable is left
fn clean_title(raw: &str) -> Option<String> {
    let first_line = raw.lines().find(|l| !l.trim().is_empty())?;
    let unquoted = first_line
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '*')
        .trim_end_matches(['.', '!']);
    let cleaned = sanitize_filename(unquoted);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Existing titles the body links to, in vault order
fn related_titles(body: &str, existing_titles: &[String]) -> Vec<String> {
    let targets: HashSet<String> = wikilink_targets(body).into_iter().collect();
    let mut seen = HashSet::new();
    existing_titles
        .iter()
        .filter(|t| targets.contains(*t) && seen.insert(t.as_str()))
        .cloned()
        .collect()
}
