//! Vault store for vaultkeeper
//!
//! The vault is a directory tree of markdown notes. Every operation goes to
//! disk; nothing is cached between calls.

mod daily;
pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, VaultError};
use crate::note::parse::{parse_document, render_document};
use crate::note::{Note, NOTE_EXTENSION};
pub use paths::{
    is_reserved, DEFAULT_DAILY_NOTES_DIR, DEFAULT_JOURNAL_DIR, RESERVED_NAMES, RESERVED_PREFIXES,
};

/// Well-known folders inside a vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultLayout {
    /// Folder of `YYYY-MM-DD.md` daily notes
    pub daily_notes_folder: String,
    /// Folder of synthesized journal entries
    pub journal_folder: String,
}

impl Default for VaultLayout {
    fn default() -> Self {
        VaultLayout {
            daily_notes_folder: DEFAULT_DAILY_NOTES_DIR.to_string(),
            journal_folder: DEFAULT_JOURNAL_DIR.to_string(),
        }
    }
}

/// Filesystem-backed note vault
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root directory of the vault
    root: PathBuf,
    /// Well-known folders
    layout: VaultLayout,
}

impl Vault {
    /// Open an existing vault directory
    #[tracing::instrument(skip(root), fields(root = %root.display()))]
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(VaultError::VaultNotFound {
                path: root.to_path_buf(),
            });
        }

        Ok(Vault {
            root: root.to_path_buf(),
            layout: VaultLayout::default(),
        })
    }

    /// Replace the well-known folder layout
    pub fn with_layout(mut self, layout: VaultLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Get the vault root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the folder layout
    pub fn layout(&self) -> &VaultLayout {
        &self.layout
    }

    /// Relative paths of every non-reserved note, in sorted path order
    fn note_paths(&self) -> Vec<PathBuf> {
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry
                        .file_name()
                        .to_str()
                        .is_some_and(paths::is_reserved_name)
            });

        let mut found: Vec<PathBuf> = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable vault entry");
                    continue;
                }
            };

            if !entry.file_type().is_file()
                || entry.path().extension().and_then(|e| e.to_str()) != Some(NOTE_EXTENSION)
            {
                continue;
            }

            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if paths::is_reserved(rel) {
                continue;
            }
            found.push(rel.to_path_buf());
        }

        // Path ordering compares component by component
        found.sort();
        found
    }

    /// Read every note in the vault; files that fail to parse are skipped
    #[tracing::instrument(skip(self))]
    pub fn list_notes(&self) -> Vec<Note> {
        self.note_paths()
            .iter()
            .filter_map(|rel| self.read_note(rel))
            .collect()
    }

    /// Titles of every note, in the same order as `list_notes`
    pub fn get_all_note_titles(&self) -> Vec<String> {
        self.note_paths()
            .iter()
            .map(|rel| paths::title_of(rel))
            .collect()
    }

    /// Read a note by vault-relative path.
    ///
    /// Returns `None` when the file is missing or cannot be parsed.
    pub fn read_note(&self, rel_path: impl AsRef<Path>) -> Option<Note> {
        let rel_path = rel_path.as_ref();
        match self.load_note(rel_path) {
            Ok(note) => note,
            Err(e) => {
                tracing::debug!(path = %rel_path.display(), error = %e, "skipping unparsable note");
                None
            }
        }
    }

    /// Read a note, reporting parse and IO failures as errors
    pub fn load_note(&self, rel_path: impl AsRef<Path>) -> Result<Option<Note>> {
        let rel_path = rel_path.as_ref();
        let full_path = self.root.join(rel_path);
        if !full_path.is_file() {
            return Ok(None);
        }

        let bytes = fs::read(&full_path)?;
        let content = String::from_utf8(bytes).map_err(|e| VaultError::InvalidFrontmatter {
            path: rel_path.to_path_buf(),
            reason: format!("not valid UTF-8: {}", e),
        })?;

        let (frontmatter, body) = parse_document(&content, rel_path)?;

        Ok(Some(Note {
            title: paths::title_of(rel_path),
            body,
            frontmatter,
            folder: paths::folder_of(rel_path),
        }))
    }

    /// Write a note to `folder/title.md`, replacing any existing file
    #[tracing::instrument(skip(self, note), fields(note = %note.key()))]
    pub fn write_note(&self, note: &Note) -> Result<PathBuf> {
        let folder = if note.folder.is_empty() {
            self.root.clone()
        } else {
            self.root.join(&note.folder)
        };
        fs::create_dir_all(&folder)
            .map_err(|e| VaultError::io_operation("create folder", folder.display(), e))?;

        let dest = folder.join(note.filename());
        let content = render_document(&note.frontmatter, &note.body)?;
        fs::write(&dest, content)
            .map_err(|e| VaultError::io_operation("write note", dest.display(), e))?;

        tracing::debug!(path = %dest.display(), "wrote note");
        Ok(dest)
    }

    /// Move a note file to a new vault-relative location.
    ///
    /// The destination must not exist; content is moved unchanged.
    #[tracing::instrument(skip(self, src_rel, dest_rel), fields(src = %src_rel.as_ref().display(), dest = %dest_rel.as_ref().display()))]
    pub fn move_note(
        &self,
        src_rel: impl AsRef<Path>,
        dest_rel: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let src = self.root.join(src_rel.as_ref());
        let dest = self.root.join(dest_rel.as_ref());

        if !src.is_file() {
            return Err(VaultError::not_found("note", src_rel.as_ref().display()));
        }
        if dest.exists() {
            return Err(VaultError::already_exists(
                "note",
                dest_rel.as_ref().display(),
            ));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| VaultError::io_operation("create folder", parent.display(), e))?;
        }

        fs::rename(&src, &dest)
            .map_err(|e| VaultError::io_operation("move note", src.display(), e))?;

        Ok(dest)
    }
}
