//! Note model for vaultkeeper
//!
//! A note is a markdown file in the vault: a YAML frontmatter header, a body,
//! and its location (folder relative to the vault root, title = file stem).

mod frontmatter;
pub(crate) mod parse;
mod types;

use std::path::PathBuf;

use serde::Serialize;

pub use frontmatter::Frontmatter;
pub use types::{format_transcript, ConversationMessage, ReflectionType, Role};

/// File extension of vault notes
pub const NOTE_EXTENSION: &str = "md";

/// A single vault entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    /// Filename stem
    pub title: String,
    /// Markdown content without the frontmatter header
    #[serde(skip)]
    pub body: String,
    /// Parsed header
    #[serde(skip)]
    pub frontmatter: Frontmatter,
    /// Containing directory relative to the vault root, empty for the root
    pub folder: String,
}

impl Note {
    /// Create a root-level note with empty frontmatter
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Note {
            title: title.into(),
            body: body.into(),
            frontmatter: Frontmatter::default(),
            folder: String::new(),
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_frontmatter(mut self, frontmatter: Frontmatter) -> Self {
        self.frontmatter = frontmatter;
        self
    }

    /// `title.md`
    pub fn filename(&self) -> String {
        format!("{}.{}", self.title, NOTE_EXTENSION)
    }

    /// Path relative to the vault root
    pub fn relative_path(&self) -> PathBuf {
        if self.folder.is_empty() {
            PathBuf::from(self.filename())
        } else {
            PathBuf::from(&self.folder).join(self.filename())
        }
    }

    /// True when the note sits directly in the vault root
    pub fn is_root(&self) -> bool {
        self.folder.is_empty()
    }

    /// Folder label for display, `(root)` for the vault root
    pub fn folder_label(&self) -> &str {
        if self.folder.is_empty() {
            ROOT_LABEL
        } else {
            &self.folder
        }
    }

    /// Key identifying the note across folders
    pub fn key(&self) -> String {
        if self.folder.is_empty() {
            self.title.clone()
        } else {
            format!("{}/{}", self.folder, self.title)
        }
    }
}

/// Display sentinel for the vault root folder
pub const ROOT_LABEL: &str = "(root)";
