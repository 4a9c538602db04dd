//! Folder classification for notes sitting in the vault root

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ApplyReport, Reconciler};
use crate::error::Result;
use crate::format::render_table;
use crate::note::{Note, ROOT_LABEL};
use crate::oracle::Oracle;
use crate::store::Vault;
use crate::text::truncate_chars;

/// Characters of body sent to the oracle for classification
const CLASSIFY_BODY_CHARS: usize = 1500;

const NO_FOLDER: &str = "NONE";

pub const DEEP_REASON: &str = "classified by language model";

/// A target folder and the keywords that send a note there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FolderRule {
    pub folder: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl FolderRule {
    pub fn new(folder: impl Into<String>, keywords: &[&str]) -> Self {
        FolderRule {
            folder: folder.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered keyword rules; earlier rules win
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRules(Vec<FolderRule>);

impl Default for FolderRules {
    fn default() -> Self {
        FolderRules(vec![
            FolderRule::new(
                "AI Adoption",
                &[
                    "ai",
                    "gpt",
                    "llm",
                    "claude",
                    "gemini",
                    "copilot",
                    "machine learning",
                    "artificial intelligence",
                ],
            ),
            FolderRule::new(
                "Documentation",
                &["documentation", "guide", "how to", "setup", "install", "tutorial"],
            ),
            // Daily notes are recognized by their date titles, not keywords
            FolderRule::new("Daily Notes", &[]),
        ])
    }
}

impl FolderRules {
    pub fn new(rules: Vec<FolderRule>) -> Self {
        FolderRules(rules)
    }

    pub fn rules(&self) -> &[FolderRule] {
        &self.0
    }

    /// First `(folder, keyword)` whose lowercase keyword occurs in `text`
    pub fn first_match(&self, text: &str) -> Option<(&str, &str)> {
        let haystack = text.to_lowercase();
        self.0.iter().find_map(|rule| {
            rule.keywords
                .iter()
                .find(|keyword| haystack.contains(&keyword.to_lowercase()))
                .map(|keyword| (rule.folder.as_str(), keyword.as_str()))
        })
    }
}

/// Move a root note into a folder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveSuggestion {
    pub note: Note,
    pub current_folder: String,
    pub suggested_folder: String,
    pub reason: String,
}

enum Mode<'a> {
    Heuristic(FolderRules),
    Deep(&'a dyn Oracle),
}

/// Suggests folders for root-level notes
pub struct StructureReconciler<'a> {
    mode: Mode<'a>,
}

impl<'a> StructureReconciler<'a> {
    /// Keyword matching against `rules`
    pub fn heuristic(rules: FolderRules) -> Self {
        StructureReconciler {
            mode: Mode::Heuristic(rules),
        }
    }

    /// Ask the oracle to pick one of the existing top-level folders
    pub fn deep(oracle: &'a dyn Oracle) -> Self {
        StructureReconciler {
            mode: Mode::Deep(oracle),
        }
    }

    fn classify(&self, note: &Note, folders: &BTreeSet<String>) -> Option<MoveSuggestion> {
        let (folder, reason) = match &self.mode {
            Mode::Heuristic(rules) => {
                let (folder, keyword) =
                    rules.first_match(&format!("{} {}", note.title, note.body))?;
                (folder.to_string(), format!("keyword match: '{}'", keyword))
            }
            Mode::Deep(oracle) => (
                classify_deep(*oracle, note, folders)?,
                DEEP_REASON.to_string(),
            ),
        };

        Some(MoveSuggestion {
            note: note.clone(),
            current_folder: ROOT_LABEL.to_string(),
            suggested_folder: folder,
            reason,
        })
    }
}

fn classify_prompt(folders: &BTreeSet<String>) -> String {
    format!(
        "\
You organize an Obsidian vault. Given a note's title and content and the list of \
existing folders, pick the folder the note belongs in.

Rules:
- Only suggest a move when there is a clear fit
- If the note does not clearly belong anywhere, answer \"{none}\"
- Answer with ONLY the folder name or \"{none}\"

Existing folders: {folders}
",
        none = NO_FOLDER,
        folders = folders.iter().cloned().collect::<Vec<_>>().join(", ")
    )
}

/// Existing folder named by the oracle, if any
fn classify_deep(oracle: &dyn Oracle, note: &Note, folders: &BTreeSet<String>) -> Option<String> {
    let request = format!(
        "Title: {}\n\nContent:\n{}",
        note.title,
        truncate_chars(&note.body, CLASSIFY_BODY_CHARS)
    );

    let answer = match oracle.ask(&classify_prompt(folders), &request) {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(note = %note.key(), error = %e, "folder classification failed");
            return None;
        }
    };

    let answer = answer
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'')
        .trim();
    if answer.is_empty() || answer == NO_FOLDER || !folders.contains(answer) {
        tracing::debug!(note = %note.key(), answer, "no folder chosen");
        return None;
    }
    Some(answer.to_string())
}

impl Reconciler for StructureReconciler<'_> {
    type Suggestion = MoveSuggestion;

    fn name(&self) -> &'static str {
        "structure"
    }

    #[tracing::instrument(skip_all)]
    fn scan(&self, vault: &Vault) -> Result<Vec<MoveSuggestion>> {
        let notes = vault.list_notes();

        let folders: BTreeSet<String> = notes
            .iter()
            .filter_map(|note| note.folder.split('/').next())
            .filter(|top| !top.is_empty())
            .map(str::to_string)
            .collect();

        let suggestions: Vec<MoveSuggestion> = notes
            .iter()
            .filter(|note| note.is_root())
            .filter_map(|note| self.classify(note, &folders))
            .collect();

        tracing::debug!(count = suggestions.len(), "structure scan complete");
        Ok(suggestions)
    }

    fn render_human(&self, suggestions: &[MoveSuggestion], out: &mut dyn Write) -> io::Result<()> {
        if suggestions.is_empty() {
            return writeln!(out, "All notes are well-organized.");
        }

        writeln!(out, "Structure suggestions ({})", suggestions.len())?;
        let rows: Vec<Vec<String>> = suggestions
            .iter()
            .map(|s| {
                vec![
                    s.note.title.clone(),
                    s.current_folder.clone(),
                    s.suggested_folder.clone(),
                    s.reason.clone(),
                ]
            })
            .collect();
        write!(
            out,
            "{}",
            render_table(&["Note", "Current", "Suggested", "Reason"], &rows)
        )
    }

    fn apply(&self, vault: &Vault, suggestions: Vec<MoveSuggestion>) -> ApplyReport {
        let mut report = ApplyReport::default();

        for suggestion in suggestions {
            let src = suggestion.note.relative_path();
            let dest = Path::new(&suggestion.suggested_folder).join(suggestion.note.filename());

            match vault.move_note(&src, &dest) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "moved note");
                    report.applied += 1;
                }
                Err(e) => report.fail(suggestion.note.key(), e),
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::testing::ScriptedOracle;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn vault_with(files: &[(&str, &str)]) -> (TempDir, Vault) {
        let dir = tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        let vault = Vault::open(dir.path()).unwrap();
        (dir, vault)
    }

    #[test]
    fn test_tutorial_goes_to_documentation() {
        let (dir, vault) = vault_with(&[("Rust Tutorial.md", "Step one: write code.\n")]);
        let reconciler = StructureReconciler::heuristic(FolderRules::default());

        let suggestions = reconciler.scan(&vault).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].current_folder, "(root)");
        assert_eq!(suggestions[0].suggested_folder, "Documentation");
        assert_eq!(suggestions[0].reason, "keyword match: 'tutorial'");

        let report = reconciler.apply(&vault, suggestions);
        assert_eq!(report.applied, 1);
        assert!(dir.path().join("Documentation/Rust Tutorial.md").exists());
        assert!(!dir.path().join("Rust Tutorial.md").exists());
    }

    #[test]
    fn test_rule_order_wins() {
        let rules = FolderRules::default();
        assert_eq!(
            rules.first_match("Setup guide for Copilot"),
            Some(("AI Adoption", "copilot"))
        );
        assert_eq!(
            rules.first_match("how to cook"),
            Some(("Documentation", "how to"))
        );
        assert_eq!(rules.first_match("groceries"), None);
    }

    #[test]
    fn test_keyword_is_substring_match() {
        assert_eq!(
            FolderRules::default().first_match("she said hello"),
            Some(("AI Adoption", "ai"))
        );
    }

    #[test]
    fn test_only_root_notes_are_classified() {
        let (_dir, vault) = vault_with(&[
            ("Projects/Install notes.md", "how to install\n"),
            ("Groceries.md", "milk, eggs\n"),
        ]);
        let suggestions = StructureReconciler::heuristic(FolderRules::default())
            .scan(&vault)
            .unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_custom_rules() {
        let (_dir, vault) = vault_with(&[("Pancakes.md", "Ingredients: flour\n")]);
        let rules = FolderRules::new(vec![FolderRule::new("Recipes", &["Ingredients"])]);
        let suggestions = StructureReconciler::heuristic(rules).scan(&vault).unwrap();
        assert_eq!(suggestions[0].suggested_folder, "Recipes");
        assert_eq!(suggestions[0].reason, "keyword match: 'Ingredients'");
    }

    #[test]
    fn test_deep_mode_accepts_existing_folder_only() {
        let (_dir, vault) = vault_with(&[
            ("Work/Meetings/Standup.md", "x\n"),
            ("Recipes/Soup.md", "y\n"),
            ("Budget.md", "Quarterly numbers\n"),
            ("Lasagna.md", "Layers of pasta\n"),
            ("Random.md", "Misc\n"),
            ("Travel.md", "Trip\n"),
        ]);
        // Root notes in order: Budget, Lasagna, Random, Travel
        let oracle = ScriptedOracle::new([
            Some("\"Work\""),
            Some("  'Recipes'\n"),
            Some("NONE"),
            None,
        ]);
        let reconciler = StructureReconciler::deep(&oracle);
        let suggestions = reconciler.scan(&vault).unwrap();

        let moves: Vec<(&str, &str)> = suggestions
            .iter()
            .map(|s| (s.note.title.as_str(), s.suggested_folder.as_str()))
            .collect();
        assert_eq!(moves, vec![("Budget", "Work"), ("Lasagna", "Recipes")]);
        assert!(suggestions.iter().all(|s| s.reason == DEEP_REASON));

        let calls = oracle.calls();
        assert!(calls[0].system.contains("Existing folders: Recipes, Work"));
        assert_eq!(
            calls[0].messages[0].content,
            "Title: Budget\n\nContent:\nQuarterly numbers\n"
        );
    }

    #[test]
    fn test_deep_mode_rejects_unknown_folder() {
        let (_dir, vault) = vault_with(&[("Work/a.md", "x\n"), ("Note.md", "y\n")]);
        let oracle = ScriptedOracle::replying(["Archive"]);
        assert!(StructureReconciler::deep(&oracle)
            .scan(&vault)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_deep_request_truncates_body() {
        let body = "é".repeat(2000);
        let (_dir, vault) = vault_with(&[("Long.md", body.as_str())]);
        let oracle = ScriptedOracle::replying(["NONE"]);
        StructureReconciler::deep(&oracle).scan(&vault).unwrap();

        let content = &oracle.calls()[0].messages[0].content;
        let sent = content.trim_start_matches("Title: Long\n\nContent:\n");
        assert_eq!(sent.chars().count(), CLASSIFY_BODY_CHARS);
    }

    #[test]
    fn test_human_preview() {
        let suggestions = vec![MoveSuggestion {
            note: Note::new("Guide", ""),
            current_folder: ROOT_LABEL.to_string(),
            suggested_folder: "Documentation".to_string(),
            reason: "keyword match: 'guide'".to_string(),
        }];
        let reconciler = StructureReconciler::heuristic(FolderRules::default());
        let mut out = Vec::new();
        reconciler.render_human(&suggestions, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Structure suggestions (1)\n"));
        assert!(text.contains("Documentation"));
        assert!(text.contains("keyword match: 'guide'"));
    }
}
