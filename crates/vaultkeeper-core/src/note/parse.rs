use super::frontmatter::Frontmatter;
use crate::error::{Result, VaultError};
use serde_yaml::Value;
use std::path::Path;

const DELIMITER: &str = "---";

/// Split a markdown document into frontmatter and body.
///
/// A document without an opening `---` line, or whose header is never closed,
/// is all body. A closed header that is not a YAML mapping is an error.
#[tracing::instrument(skip(content, path), fields(path = %path.display()))]
pub(crate) fn parse_document(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((yaml, body)) = split_header(content) else {
        return Ok((Frontmatter::default(), content.to_string()));
    };

    if yaml.trim().is_empty() {
        return Ok((Frontmatter::default(), body.to_string()));
    }

    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| VaultError::InvalidFrontmatter {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let front = match value {
        Value::Null => Frontmatter::default(),
        Value::Mapping(mapping) => Frontmatter::from_mapping(mapping),
        _ => {
            return Err(VaultError::InvalidFrontmatter {
                path: path.to_path_buf(),
                reason: "frontmatter is not a key/value mapping".to_string(),
            })
        }
    };

    Ok((front, body.to_string()))
}

/// Locate the header block; returns (yaml, body) when both delimiters exist.
fn split_header(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let first_end = content.find('\n')?;
    if content[..first_end].trim_end() != DELIMITER {
        return None;
    }

    let yaml_start = first_end + 1;
    let mut offset = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return Some((yaml, body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }

    None
}

/// Serialize frontmatter and body into a markdown document.
///
/// Empty frontmatter produces no header at all.
pub(crate) fn render_document(front: &Frontmatter, body: &str) -> Result<String> {
    let mut out = String::new();

    if !front.is_empty() {
        let yaml = serde_yaml::to_string(&Value::Mapping(front.to_mapping()))?;
        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(&yaml);
        if !yaml.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(DELIMITER);
        out.push_str("\n\n");
    }

    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }

    Ok(out)
}
