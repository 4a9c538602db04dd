use std::path::{Component, Path};

/// Directory names that never hold user notes
pub const RESERVED_NAMES: [&str; 3] = [".obsidian", ".trash", "Templates"];

/// Name prefixes of other tools' scratch directories
pub const RESERVED_PREFIXES: [&str; 1] = [".smtcmp_"];

/// Default folder holding one note per day, named `YYYY-MM-DD.md`
pub const DEFAULT_DAILY_NOTES_DIR: &str = "Daily Notes";

/// Default folder for synthesized journal entries
pub const DEFAULT_JOURNAL_DIR: &str = "Journal";

/// True when a single path component is reserved
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.contains(&name) || RESERVED_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// True when any component of a vault-relative path is reserved
pub fn is_reserved(rel_path: &Path) -> bool {
    rel_path.components().any(|c| match c {
        Component::Normal(part) => part.to_str().is_some_and(is_reserved_name),
        _ => false,
    })
}

/// Render a relative path with `/` separators regardless of platform
pub fn to_slash(rel_path: &Path) -> String {
    rel_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Folder part of a relative note path, empty for the vault root
pub fn folder_of(rel_path: &Path) -> String {
    rel_path.parent().map(to_slash).unwrap_or_default()
}

/// File stem of a note path
pub fn title_of(rel_path: &Path) -> String {
    rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
