//! Wikilink suggestions
//!
//! The exact pass looks for whole-word, case-insensitive mentions of other
//! note titles that are not linked yet. The optional semantic pass asks the
//! oracle which of the remaining titles are related to the note.

use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};

use regex::Regex;
use serde::Serialize;

use super::{ApplyReport, Reconciler};
use crate::error::Result;
use crate::format::render_table;
use crate::note::Note;
use crate::oracle::Oracle;
use crate::store::Vault;
use crate::text::{find_unlinked, line_around, title_pattern, truncate_chars, wikilink_targets};

/// Titles shorter than this are never suggested by the exact pass
pub const MIN_TITLE_CHARS: usize = 3;

/// Heading of the section that collects semantic links
pub const RELATED_HEADING: &str = "## Related";

const CONTEXT_WIDTH: usize = 60;

const DEEP_LINK_PROMPT: &str = "\
You organize an Obsidian vault. Given a note's content and the titles of other notes \
in the vault, choose the titles that should be linked from this note as [[wikilinks]] \
because they are related in meaning, even when the note never mentions them verbatim.

Return ONLY a JSON array of title strings, for example [\"Title A\", \"Title B\"].
Return [] when no links are warranted.
";

/// Why a link was suggested
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "line", rename_all = "lowercase")]
pub enum LinkContext {
    /// The trimmed body line holding the mention
    Line(String),
    /// Suggested by the oracle
    Semantic,
}

impl fmt::Display for LinkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkContext::Line(line) => write!(f, "{}", line),
            LinkContext::Semantic => write!(f, "(semantic match)"),
        }
    }
}

/// A title that `note` should link to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSuggestion {
    pub note: Note,
    pub title_to_link: String,
    pub context: LinkContext,
}

/// Suggests and inserts wikilinks
#[derive(Clone, Copy, Default)]
pub struct LinkReconciler<'a> {
    oracle: Option<&'a dyn Oracle>,
}

impl<'a> LinkReconciler<'a> {
    /// Exact mentions only
    pub fn exact() -> Self {
        LinkReconciler { oracle: None }
    }

    /// Exact mentions plus oracle-suggested related titles
    pub fn deep(oracle: &'a dyn Oracle) -> Self {
        LinkReconciler {
            oracle: Some(oracle),
        }
    }

    fn suggest_for_note(
        &self,
        note: &Note,
        titles: &[String],
        patterns: &[(&str, Regex)],
    ) -> Vec<LinkSuggestion> {
        let linked: HashSet<String> = wikilink_targets(&note.body).into_iter().collect();
        let mut suggestions = Vec::new();

        for (title, pattern) in patterns {
            if *title == note.title || linked.contains(*title) {
                continue;
            }
            if let Some(hit) = find_unlinked(&note.body, pattern) {
                suggestions.push(LinkSuggestion {
                    note: note.clone(),
                    title_to_link: title.to_string(),
                    context: LinkContext::Line(line_around(&note.body, &hit)),
                });
            }
        }

        if let Some(oracle) = self.oracle {
            if !note.body.trim().is_empty() {
                let mut taken: HashSet<String> = linked;
                taken.extend(suggestions.iter().map(|s| s.title_to_link.clone()));
                for title in semantic_titles(oracle, note, titles, &taken) {
                    suggestions.push(LinkSuggestion {
                        note: note.clone(),
                        title_to_link: title,
                        context: LinkContext::Semantic,
                    });
                }
            }
        }

        suggestions
    }
}

/// Oracle-picked titles not already linked or suggested; empty on any failure
fn semantic_titles(
    oracle: &dyn Oracle,
    note: &Note,
    titles: &[String],
    taken: &HashSet<String>,
) -> Vec<String> {
    let candidates: Vec<&str> = titles
        .iter()
        .filter(|t| **t != note.title && !taken.contains(*t))
        .map(String::as_str)
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let request = format!(
        "Note title: {}\n\nNote content:\n{}\n\nAvailable titles:\n{}",
        note.title,
        note.body,
        candidates.join("\n")
    );

    let reply = match oracle.ask(DEEP_LINK_PROMPT, &request) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(note = %note.key(), error = %e, "semantic link request failed");
            return Vec::new();
        }
    };

    let Some(picked) = first_json_array(&reply) else {
        tracing::debug!(note = %note.key(), "no JSON array in semantic link reply");
        return Vec::new();
    };

    let mut seen: HashSet<&str> = HashSet::new();
    picked
        .iter()
        .filter_map(serde_json::Value::as_str)
        .filter(|t| candidates.contains(t) && seen.insert(*t))
        .map(str::to_string)
        .collect()
}

/// The first JSON array embedded anywhere in `text`
fn first_json_array(text: &str) -> Option<Vec<serde_json::Value>> {
    text.match_indices('[').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<Vec<serde_json::Value>>()
            .next()
            .and_then(|parsed| parsed.ok())
    })
}

/// Whole-word patterns for every title long enough to suggest
fn exact_patterns(titles: &[String]) -> Vec<(&str, Regex)> {
    titles
        .iter()
        .filter(|t| t.chars().count() >= MIN_TITLE_CHARS)
        .filter_map(|t| title_pattern(t).map(|re| (t.as_str(), re)))
        .collect()
}

/// Titles in vault order with duplicates removed
fn distinct_titles(titles: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    titles
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Link the first unlinked mention of `title`; false when there is none
fn link_first_mention(body: &mut String, title: &str) -> bool {
    let Some(pattern) = title_pattern(title) else {
        return false;
    };
    let Some(hit) = find_unlinked(body, &pattern) else {
        return false;
    };

    let matched = &body[hit.clone()];
    let link = if matched == title {
        format!("[[{}]]", title)
    } else {
        format!("[[{}|{}]]", title, matched)
    };
    body.replace_range(hit, &link);
    true
}

/// Add `- [[title]]` under the related section, creating it when missing
fn append_related(body: &mut String, title: &str) {
    let has_section = body.lines().any(|line| line.trim_end() == RELATED_HEADING);
    if !has_section {
        let trimmed_len = body.trim_end().len();
        body.truncate(trimmed_len);
        if !body.is_empty() {
            body.push_str("\n\n");
        }
        body.push_str(RELATED_HEADING);
        body.push('\n');
    } else if !body.ends_with('\n') {
        body.push('\n');
    }
    body.push_str(&format!("- [[{}]]\n", title));
}

impl Reconciler for LinkReconciler<'_> {
    type Suggestion = LinkSuggestion;

    fn name(&self) -> &'static str {
        "links"
    }

    #[tracing::instrument(skip_all, fields(deep = self.oracle.is_some()))]
    fn scan(&self, vault: &Vault) -> Result<Vec<LinkSuggestion>> {
        let titles = distinct_titles(vault.get_all_note_titles());
        let patterns = exact_patterns(&titles);
        let suggestions: Vec<LinkSuggestion> = vault
            .list_notes()
            .iter()
            .flat_map(|note| self.suggest_for_note(note, &titles, &patterns))
            .collect();

        tracing::debug!(count = suggestions.len(), "link scan complete");
        Ok(suggestions)
    }

    fn render_human(&self, suggestions: &[LinkSuggestion], out: &mut dyn Write) -> io::Result<()> {
        if suggestions.is_empty() {
            return writeln!(out, "No new wikilinks to suggest.");
        }

        writeln!(out, "Wikilink suggestions ({})", suggestions.len())?;
        let rows: Vec<Vec<String>> = suggestions
            .iter()
            .map(|s| {
                let context = s.context.to_string();
                vec![
                    s.note.title.clone(),
                    format!("[[{}]]", s.title_to_link),
                    truncate_chars(&context, CONTEXT_WIDTH).to_string(),
                ]
            })
            .collect();
        write!(out, "{}", render_table(&["Note", "Link To", "Context"], &rows))
    }

    fn apply(&self, vault: &Vault, suggestions: Vec<LinkSuggestion>) -> ApplyReport {
        let mut report = ApplyReport::default();

        // One write per note, in first-seen order
        let mut groups: Vec<(String, Vec<LinkSuggestion>)> = Vec::new();
        for suggestion in suggestions {
            let key = suggestion.note.key();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, group)) => group.push(suggestion),
                None => groups.push((key, vec![suggestion])),
            }
        }

        for (key, group) in groups {
            let Some(mut note) = group.first().map(|s| s.note.clone()) else {
                continue;
            };
            let mut linked = 0;

            for suggestion in &group {
                match suggestion.context {
                    LinkContext::Line(_) => {
                        if link_first_mention(&mut note.body, &suggestion.title_to_link) {
                            linked += 1;
                        } else {
                            report.skip(
                                key.clone(),
                                format!(
                                    "'{}' is no longer mentioned",
                                    suggestion.title_to_link
                                ),
                            );
                        }
                    }
                    LinkContext::Semantic => {
                        append_related(&mut note.body, &suggestion.title_to_link);
                        linked += 1;
                    }
                }
            }

            if linked == 0 {
                continue;
            }

            match vault.write_note(&note) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), links = linked, "added wikilinks");
                    report.applied += linked;
                }
                Err(e) => report.fail(key, e),
            }
        }

        report
    }
}
