use std::fs;
use std::path::{Path, PathBuf};

use super::Vault;
use crate::error::{Result, VaultError};
use crate::note::parse::render_document;
use crate::note::{Frontmatter, Note, NOTE_EXTENSION};

const PLAN_HEADING: &str = "## Plan";

impl Vault {
    /// Most recent notes directly inside `folder`, newest filename first
    pub fn list_journal_notes(&self, folder: &str, limit: usize) -> Vec<Note> {
        let dir = self.root.join(folder);
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| {
                Path::new(name).extension().and_then(|e| e.to_str()) == Some(NOTE_EXTENSION)
            })
            .collect();
        names.sort_unstable_by(|a, b| b.cmp(a));

        names
            .iter()
            .take(limit)
            .filter_map(|name| self.read_note(Path::new(folder).join(name)))
            .collect()
    }

    /// Path of the daily note for `date` (YYYY-MM-DD), relative to the vault
    pub fn daily_note_path(&self, date: &str) -> PathBuf {
        Path::new(&self.layout.daily_notes_folder).join(format!("{}.{}", date, NOTE_EXTENSION))
    }

    /// Read the daily note for `date`, if one exists
    pub fn read_daily_note(&self, date: &str) -> Option<Note> {
        self.read_note(self.daily_note_path(date))
    }

    /// Create or update the `## Plan` section of the daily note for `date`.
    ///
    /// - Missing note: created with daily frontmatter and the plan as body.
    /// - Note without a plan: the plan is appended after a blank line.
    /// - Note with a plan: that section is replaced up to the next `## ` heading.
    #[tracing::instrument(skip(self, plan_markdown))]
    pub fn write_daily_plan(&self, date: &str, plan_markdown: &str) -> Result<PathBuf> {
        let dest = self.root.join(self.daily_note_path(date));
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| VaultError::io_operation("create folder", parent.display(), e))?;
        }

        let content = if dest.exists() {
            let existing = fs::read_to_string(&dest)
                .map_err(|e| VaultError::io_operation("read note", dest.display(), e))?;
            match replace_plan_section(&existing, plan_markdown) {
                Some(updated) => updated,
                None => format!("{}\n\n{}\n", existing.trim_end(), plan_markdown),
            }
        } else {
            let front = Frontmatter::dated(date)
                .with_type("daily-note")
                .with_tags(["daily"]);
            render_document(&front, plan_markdown)?
        };

        fs::write(&dest, content)
            .map_err(|e| VaultError::io_operation("write note", dest.display(), e))?;
        Ok(dest)
    }
}

/// Replace an existing `## Plan` section; `None` when there is none
fn replace_plan_section(content: &str, plan_markdown: &str) -> Option<String> {
    let start = find_heading_line(content, PLAN_HEADING)?;
    let after_heading = start + PLAN_HEADING.len();
    let end = content[after_heading..]
        .find("\n## ")
        .map(|i| after_heading + i)
        .unwrap_or(content.len());

    let mut updated = String::with_capacity(content.len() + plan_markdown.len());
    updated.push_str(&content[..start]);
    updated.push_str(plan_markdown.trim_end());
    if end < content.len() {
        updated.push('\n');
        updated.push_str(&content[end..]);
    } else {
        updated.push('\n');
    }
    Some(updated)
}

/// Byte offset of a line that is exactly `heading`
fn find_heading_line(content: &str, heading: &str) -> Option<usize> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if line.trim_end() == heading {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}
