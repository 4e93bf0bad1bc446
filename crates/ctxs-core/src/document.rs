//! # Context Documents
//!
//! A context document is UTF-8 text of the form
//!
//! ```text
//! ---
//! id: react-hooks
//! title: React Hooks
//! ...
//! ---
//! # Markdown body
//! ```
//!
//! [`ContextDocument::parse`] splits the frontmatter block off, parses it with
//! `serde_yaml`, and keeps both the raw mapping (for structural validation and
//! JSON output) and typed views of the fields business rules need.
//!
//! Typed fields are extracted leniently. A document with `version: 1` or a
//! missing `id` still parses; the structural pass reports the problem.

use std::collections::BTreeMap;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::DocumentError;
use crate::platform::{PlatformConfig, PlatformKind};

/// Frontmatter delimiter line.
const DELIMITER: &str = "---";

/// Field name under which the markdown body appears in serialized output.
pub const CONTENT_FIELD: &str = "_content";

/// One parsed context document.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextDocument {
    /// Kebab-case identifier, empty when absent.
    pub id: String,
    /// Human-readable title, empty when absent.
    pub title: String,
    /// Short description, empty when absent.
    pub description: String,
    /// Semantic version string, empty when absent or not a string.
    pub version: String,
    /// Free-form classification.
    pub category: String,
    /// Platform configurations keyed by platform name.
    pub platforms: BTreeMap<String, PlatformConfig>,
    /// IDs this document depends on.
    pub requires: Vec<String>,
    /// IDs this document recommends.
    pub suggests: Vec<String>,
    /// IDs this document cannot be combined with.
    pub conflicts: Vec<String>,
    /// IDs this document replaces.
    pub supersedes: Vec<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Author, if declared.
    pub author: Option<String>,
    /// Contributors.
    pub contributors: Vec<String>,
    /// Trimmed markdown body.
    pub content: String,
    frontmatter: Map<String, Value>,
}

impl ContextDocument {
    /// Parse source text into a document.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::MissingFrontmatter`] if the text does not start with
    ///   a `---` line followed later by a closing `---` line.
    /// - [`DocumentError::Yaml`] if the frontmatter is not valid YAML.
    /// - [`DocumentError::NotAMapping`] if it parses to anything but a mapping.
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        let (yaml, body) = split_frontmatter(source).ok_or(DocumentError::MissingFrontmatter)?;

        let value: Value =
            serde_yaml::from_str(yaml).map_err(|e| DocumentError::Yaml(e.to_string()))?;

        match value {
            Value::Object(map) => Ok(Self::from_parts(map, body.trim().to_string())),
            other => Err(DocumentError::NotAMapping {
                found: json_type_name(&other),
            }),
        }
    }

    /// Read and parse a document file.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Io`] if the file cannot be read, otherwise the errors
    /// of [`ContextDocument::parse`].
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let source = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    /// Build a document from an already-parsed frontmatter mapping and body.
    pub fn from_parts(frontmatter: Map<String, Value>, content: String) -> Self {
        let platforms = frontmatter
            .get("platforms")
            .and_then(Value::as_object)
            .map(|platforms| {
                platforms
                    .iter()
                    .map(|(name, cfg)| (name.clone(), PlatformConfig::from_value(name, cfg)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: str_field(&frontmatter, "id"),
            title: str_field(&frontmatter, "title"),
            description: str_field(&frontmatter, "description"),
            version: str_field(&frontmatter, "version"),
            category: str_field(&frontmatter, "category"),
            platforms,
            requires: list_field(&frontmatter, "requires"),
            suggests: list_field(&frontmatter, "suggests"),
            conflicts: list_field(&frontmatter, "conflicts"),
            supersedes: list_field(&frontmatter, "supersedes"),
            tags: list_field(&frontmatter, "tags"),
            author: frontmatter
                .get("author")
                .and_then(Value::as_str)
                .map(str::to_string),
            contributors: list_field(&frontmatter, "contributors"),
            content,
            frontmatter,
        }
    }

    /// The frontmatter mapping exactly as parsed.
    pub fn frontmatter(&self) -> &Map<String, Value> {
        &self.frontmatter
    }

    /// The frontmatter as a JSON value, for structural validation.
    pub fn frontmatter_value(&self) -> Value {
        Value::Object(self.frontmatter.clone())
    }

    /// Look up a platform entry by kind.
    pub fn platform(&self, kind: &PlatformKind) -> Option<&PlatformConfig> {
        self.platforms.get(kind.as_str())
    }

    /// Whether the document declares `compatible: true` for `kind`.
    pub fn is_compatible_with(&self, kind: &PlatformKind) -> bool {
        self.platform(kind).is_some_and(PlatformConfig::is_compatible)
    }

    /// Estimated rendered size: body length plus title length plus a fixed
    /// per-document overhead for generated wrapping.
    pub fn estimated_size(&self, overhead: usize) -> usize {
        self.content.chars().count() + self.title.chars().count() + overhead
    }

    /// Render back to source text (`---`, YAML, `---`, body).
    ///
    /// # Errors
    ///
    /// [`DocumentError::Yaml`] if the frontmatter cannot be serialized.
    pub fn render(&self) -> Result<String, DocumentError> {
        let yaml = serde_yaml::to_string(&self.frontmatter)
            .map_err(|e| DocumentError::Yaml(e.to_string()))?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}\n", self.content))
    }
}

impl Serialize for ContextDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.frontmatter.len() + 1))?;
        for (key, value) in &self.frontmatter {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(CONTENT_FIELD, &self.content)?;
        map.end()
    }
}

/// Split `source` into the frontmatter block and the remaining body.
///
/// The first line must be exactly `---`; the block ends at the next line that
/// is exactly `---`. A trailing `\r` is tolerated on both delimiter lines.
/// Returns `None` when either delimiter is missing.
pub fn split_frontmatter(source: &str) -> Option<(&str, &str)> {
    let rest = source
        .strip_prefix("---\r\n")
        .or_else(|| source.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let bare = line.trim_end_matches('\n').trim_end_matches('\r');
        if bare == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

fn str_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn list_field(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
