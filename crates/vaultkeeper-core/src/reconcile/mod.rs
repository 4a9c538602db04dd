//! Vault reconciliation: scan for suggested edits, preview them, apply them
//!
//! Each reconciler scans the whole vault into a list of suggestions. Nothing
//! touches disk until [`Reconciler::apply`], which handles every item on its
//! own so one failing note never blocks the rest.

pub mod frontmatter;
pub mod links;
pub mod structure;

use std::io::{self, Write};

use serde::Serialize;

use crate::error::Result;
use crate::format::OutputFormat;
use crate::store::Vault;

pub use frontmatter::{FrontmatterReconciler, FrontmatterSuggestion};
pub use links::{LinkContext, LinkReconciler, LinkSuggestion};
pub use structure::{FolderRule, FolderRules, MoveSuggestion, StructureReconciler};

/// A scan/preview/apply pass over the vault
pub trait Reconciler {
    type Suggestion: Serialize;

    /// Short name used in reports (`links`, `frontmatter`, `structure`)
    fn name(&self) -> &'static str;

    /// Derive suggestions from the current vault contents
    fn scan(&self, vault: &Vault) -> Result<Vec<Self::Suggestion>>;

    /// Write a human-readable preview of `suggestions`
    fn render_human(&self, suggestions: &[Self::Suggestion], out: &mut dyn Write)
        -> io::Result<()>;

    /// Apply suggestions to disk, reporting per-item failures
    fn apply(&self, vault: &Vault, suggestions: Vec<Self::Suggestion>) -> ApplyReport;
}

/// A suggestion that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyFailure {
    /// Note key (`folder/title`)
    pub note: String,
    pub error: String,
}

/// A suggestion that no longer applied and was left alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSuggestion {
    pub note: String,
    pub reason: String,
}

/// Outcome of an apply pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Number of suggestions written to disk
    pub applied: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedSuggestion>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ApplyFailure>,
}

impl ApplyReport {
    pub(crate) fn fail(&mut self, note: impl Into<String>, error: impl std::fmt::Display) {
        let note = note.into();
        let error = error.to_string();
        tracing::warn!(note = %note, error = %error, "failed to apply suggestion");
        self.failures.push(ApplyFailure { note, error });
    }

    pub(crate) fn skip(&mut self, note: impl Into<String>, reason: impl Into<String>) {
        let note = note.into();
        let reason = reason.into();
        tracing::debug!(note = %note, reason = %reason, "skipped suggestion");
        self.skipped.push(SkippedSuggestion { note, reason });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[derive(Serialize)]
struct PreviewDocument<'a, S: Serialize> {
    kind: &'static str,
    count: usize,
    suggestions: &'a [S],
}

/// Write a preview of `suggestions` in the requested format
pub fn preview<R: Reconciler + ?Sized>(
    reconciler: &R,
    suggestions: &[R::Suggestion],
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Human => reconciler.render_human(suggestions, out)?,
        OutputFormat::Json => {
            let doc = PreviewDocument {
                kind: reconciler.name(),
                count: suggestions.len(),
                suggestions,
            };
            serde_json::to_writer_pretty(&mut *out, &doc)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
