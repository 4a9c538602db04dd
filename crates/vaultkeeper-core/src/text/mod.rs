//! Text helpers shared by the reconcilers and synthesizers

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

/// `[[target]]`, `[[target|alias]]`, `[[target#heading]]`
static WIKILINK_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Compile a fixed pattern once; a bad pattern is logged and disables the caller
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Option<Regex>>,
    pattern: &str,
) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, pattern, "failed to compile regex");
            None
        }
    })
    .as_ref()
}

fn wikilink_regex() -> Option<&'static Regex> {
    cached_regex(&WIKILINK_RE, r"\[\[([^\]]+)\]\]")
}

/// Byte ranges of every `[[...]]` in `body`
pub fn wikilink_spans(body: &str) -> Vec<Range<usize>> {
    let Some(re) = wikilink_regex() else {
        return Vec::new();
    };
    re.find_iter(body).map(|m| m.range()).collect()
}

/// Link targets of every wikilink: alias and heading anchor removed, trimmed
pub fn wikilink_targets(body: &str) -> Vec<String> {
    let Some(re) = wikilink_regex() else {
        return Vec::new();
    };
    re.captures_iter(body)
        .filter_map(|cap| {
            let inner = cap.get(1)?.as_str();
            let target = inner.split(['|', '#']).next().unwrap_or(inner).trim();
            (!target.is_empty()).then(|| target.to_string())
        })
        .collect()
}

/// Case-insensitive whole-word pattern for a note title
pub fn title_pattern(title: &str) -> Option<Regex> {
    match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(title))) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(title, error = %e, "failed to compile title pattern");
            None
        }
    }
}

/// First match of `pattern` that does not overlap an existing wikilink
pub fn find_unlinked(body: &str, pattern: &Regex) -> Option<Range<usize>> {
    let links = wikilink_spans(body);
    pattern
        .find_iter(body)
        .map(|m| m.range())
        .find(|hit| {
            !links
                .iter()
                .any(|link| hit.start < link.end && link.start < hit.end)
        })
}

/// The trimmed line containing `range`
pub fn line_around(body: &str, range: &Range<usize>) -> String {
    let start = body[..range.start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = body[range.end..]
        .find('\n')
        .map(|i| range.end + i)
        .unwrap_or(body.len());
    body[start..end].trim().to_string()
}

/// At most `max` characters of `text`, cut on a character boundary
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Replace characters that are not allowed in file names
pub fn sanitize_filename(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '#' | '^' | '[' | ']' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
