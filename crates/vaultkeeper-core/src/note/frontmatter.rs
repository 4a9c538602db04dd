use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};

const DATE_KEY: &str = "date";
const TYPE_KEY: &str = "type";
const TAGS_KEY: &str = "tags";
const RELATED_KEY: &str = "related";

/// Note frontmatter (YAML header)
///
/// The four recognized fields are typed; every other key lands in `extra`
/// in its original order and is written back unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// ISO date string, empty when unknown
    pub date: String,
    /// Free-text category label, empty when unknown
    pub note_type: String,
    /// Tags for categorization
    pub tags: Vec<String>,
    /// Titles of related notes
    pub related: Vec<String>,
    /// Unrecognized keys, preserved verbatim
    pub extra: Mapping,
}

impl Serialize for Frontmatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_mapping().serialize(serializer)
    }
}

impl Frontmatter {
    /// Create frontmatter carrying only a date
    pub fn dated(date: impl Into<String>) -> Self {
        Frontmatter {
            date: date.into(),
            ..Default::default()
        }
    }

    /// Set the type label
    pub fn with_type(mut self, note_type: impl Into<String>) -> Self {
        self.note_type = note_type.into();
        self
    }

    /// Add tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add related note titles
    pub fn with_related(mut self, related: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.related.extend(related.into_iter().map(Into::into));
        self
    }

    /// True when nothing would be written to the header
    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
            && self.note_type.is_empty()
            && self.tags.is_empty()
            && self.related.is_empty()
            && self.extra.is_empty()
    }

    /// Build frontmatter from a parsed YAML mapping
    pub fn from_mapping(mapping: Mapping) -> Self {
        let mut front = Frontmatter::default();

        for (key, value) in mapping {
            match key.as_str() {
                Some(DATE_KEY) => front.date = scalar_to_string(&value),
                Some(TYPE_KEY) => front.note_type = scalar_to_string(&value),
                Some(TAGS_KEY) => front.tags = value_to_list(&value),
                Some(RELATED_KEY) => front.related = value_to_list(&value),
                _ => {
                    front.extra.insert(key, value);
                }
            }
        }

        front
    }

    /// Ordered mapping for serialization: date, type, tags, related, then extra keys
    pub fn to_mapping(&self) -> Mapping {
        let mut mapping = Mapping::new();

        if !self.date.is_empty() {
            mapping.insert(DATE_KEY.into(), Value::String(self.date.clone()));
        }
        if !self.note_type.is_empty() {
            mapping.insert(TYPE_KEY.into(), Value::String(self.note_type.clone()));
        }
        if !self.tags.is_empty() {
            mapping.insert(TAGS_KEY.into(), string_sequence(&self.tags));
        }
        if !self.related.is_empty() {
            mapping.insert(RELATED_KEY.into(), string_sequence(&self.related));
        }
        for (key, value) in &self.extra {
            mapping.insert(key.clone(), value.clone());
        }

        mapping
    }
}

fn string_sequence(items: &[String]) -> Value {
    Value::Sequence(items.iter().cloned().map(Value::String).collect())
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // Structured values in a scalar slot are kept as their YAML text
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn value_to_list(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Sequence(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(scalar_to_string)
            .filter(|s| !s.is_empty())
            .collect(),
        other => {
            let single = scalar_to_string(other);
            if single.is_empty() {
                Vec::new()
            } else {
                vec![single]
            }
        }
    }
}
