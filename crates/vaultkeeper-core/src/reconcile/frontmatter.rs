//! Frontmatter normalization
//!
//! Fills in `date` from a `YYYY-MM-DD` title prefix, lifts inline
//! `Tags: #a #b` lines into the `tags` list, and infers `type` from the
//! well-known daily and journal folders.

use std::io::{self, Write};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::{ApplyReport, Reconciler};
use crate::error::Result;
use crate::format::render_table;
use crate::note::{Frontmatter, Note};
use crate::store::{Vault, VaultLayout};
use crate::text::cached_regex;

static INLINE_TAGS_RE: OnceLock<Option<Regex>> = OnceLock::new();
static TAG_RE: OnceLock<Option<Regex>> = OnceLock::new();
static DATE_PREFIX_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn inline_tags_regex() -> Option<&'static Regex> {
    cached_regex(&INLINE_TAGS_RE, r"(?i)^tags?:\s*(.+)$")
}

fn tag_regex() -> Option<&'static Regex> {
    cached_regex(&TAG_RE, r"#([\w/\-]+)")
}

fn date_prefix_regex() -> Option<&'static Regex> {
    cached_regex(&DATE_PREFIX_RE, r"^([0-9]{4}-[0-9]{2}-[0-9]{2})")
}

/// Replacement frontmatter for one note
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontmatterSuggestion {
    pub note: Note,
    pub suggested: Frontmatter,
}

impl FrontmatterSuggestion {
    /// Human summary, e.g. `date: 2026-01-15; type: daily; tags: +work, urgent`
    pub fn describe_changes(&self) -> String {
        let current = &self.note.frontmatter;
        let mut changes = Vec::new();

        if !self.suggested.date.is_empty() && self.suggested.date != current.date {
            changes.push(format!("date: {}", self.suggested.date));
        }
        if !self.suggested.note_type.is_empty() && self.suggested.note_type != current.note_type
        {
            changes.push(format!("type: {}", self.suggested.note_type));
        }
        let added: Vec<&str> = self
            .suggested
            .tags
            .iter()
            .filter(|tag| !current.tags.contains(tag))
            .map(String::as_str)
            .collect();
        if !added.is_empty() {
            changes.push(format!("tags: +{}", added.join(", ")));
        }

        changes.join("; ")
    }
}

/// Normalizes frontmatter across the vault
#[derive(Debug, Clone, Default)]
pub struct FrontmatterReconciler;

impl FrontmatterReconciler {
    /// Suggested frontmatter for `note`, or `None` when nothing would change
    pub fn suggest(&self, note: &Note, layout: &VaultLayout) -> Option<Frontmatter> {
        let current = &note.frontmatter;
        let mut working = current.clone();
        let mut changed = false;

        if working.date.is_empty() {
            if let Some(date) = date_prefix_regex()
                .and_then(|re| re.captures(&note.title))
                .and_then(|cap| cap.get(1))
            {
                working.date = date.as_str().to_string();
                changed = true;
            }
        }

        for tag in inline_tags(&note.body) {
            if !working.tags.contains(&tag) {
                working.tags.push(tag);
                changed = true;
            }
        }

        if working.note_type.is_empty() {
            if note.folder == layout.daily_notes_folder {
                working.note_type = "daily".to_string();
                changed = true;
            } else if note.folder == layout.journal_folder {
                working.note_type = "journal".to_string();
                changed = true;
            }
        }

        // Bare notes with no signal are left alone
        if current.date.is_empty()
            && current.note_type.is_empty()
            && current.tags.is_empty()
            && !changed
        {
            return None;
        }

        changed.then_some(working)
    }
}

/// `#tags` found on every `tags:` / `tag:` line, first-seen order
fn inline_tags(body: &str) -> Vec<String> {
    let (Some(line_re), Some(tag_re)) = (inline_tags_regex(), tag_regex()) else {
        return Vec::new();
    };

    let mut tags: Vec<String> = Vec::new();
    for line in body.lines() {
        let Some(rest) = line_re.captures(line).and_then(|cap| cap.get(1)) else {
            continue;
        };
        for cap in tag_re.captures_iter(rest.as_str()) {
            let tag = cap[1].to_string();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}

/// Body with every inline tag line that carried a `#tag` removed, trimmed
fn strip_inline_tag_lines(body: &str) -> String {
    let (Some(line_re), Some(tag_re)) = (inline_tags_regex(), tag_regex()) else {
        return body.trim().to_string();
    };

    body.lines()
        .filter(|line| {
            !line_re
                .captures(line)
                .and_then(|cap| cap.get(1))
                .is_some_and(|rest| tag_re.is_match(rest.as_str()))
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

impl Reconciler for FrontmatterReconciler {
    type Suggestion = FrontmatterSuggestion;

    fn name(&self) -> &'static str {
        "frontmatter"
    }

    #[tracing::instrument(skip_all)]
    fn scan(&self, vault: &Vault) -> Result<Vec<FrontmatterSuggestion>> {
        let layout = vault.layout();
        let suggestions: Vec<FrontmatterSuggestion> = vault
            .list_notes()
            .into_iter()
            .filter_map(|note| {
                let suggested = self.suggest(&note, layout)?;
                Some(FrontmatterSuggestion { note, suggested })
            })
            .collect();

        tracing::debug!(count = suggestions.len(), "frontmatter scan complete");
        Ok(suggestions)
    }

    fn render_human(
        &self,
        suggestions: &[FrontmatterSuggestion],
        out: &mut dyn Write,
    ) -> io::Result<()> {
        if suggestions.is_empty() {
            return writeln!(out, "All notes have complete frontmatter.");
        }

        writeln!(out, "Frontmatter updates ({} notes)", suggestions.len())?;
        let rows: Vec<Vec<String>> = suggestions
            .iter()
            .map(|s| {
                vec![
                    s.note.title.clone(),
                    s.note.folder_label().to_string(),
                    s.describe_changes(),
                ]
            })
            .collect();
        write!(out, "{}", render_table(&["Note", "Folder", "Changes"], &rows))
    }

    fn apply(&self, vault: &Vault, suggestions: Vec<FrontmatterSuggestion>) -> ApplyReport {
        let mut report = ApplyReport::default();

        for FrontmatterSuggestion { mut note, suggested } in suggestions {
            note.frontmatter = suggested;
            note.body = strip_inline_tag_lines(&note.body);

            match vault.write_note(&note) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "updated frontmatter");
                    report.applied += 1;
                }
                Err(e) => report.fail(note.key(), e),
            }
        }

        report
    }
}
