//! # Validation Issues
//!
//! Every per-document finding (structural, business rule, content heuristic,
//! relationship, compatibility) is data, not an error: a [`ValidationIssue`]
//! carrying its [`IssueKind`], [`Severity`], a JSON Pointer into the
//! frontmatter, and a human-readable message.
//!
//! Serialized field names match the JSON report format consumed by CI:
//! `{"type", "severity", "path", "message", "data"}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How serious an issue is. Only [`Severity::Error`] affects validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Makes the document invalid.
    Error,
    /// Reported, never affects validity.
    Warning,
    /// Advisory hint.
    Info,
}

impl Severity {
    /// Lowercase label as used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classification of an issue, serialized as its `type` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    // Parsing and structure
    /// Document could not be read or parsed.
    ParseError,
    /// JSON-Schema violation.
    SchemaValidation,

    // Business rules
    /// `requires` edges form a cycle.
    CyclicDependency,
    /// `id` is not kebab-case.
    InvalidId,
    /// `version` is not a semantic version.
    InvalidVersion,
    /// `requires` and `conflicts` share IDs.
    ConflictingRelationships,
    /// Description outside the expected length range.
    DescriptionLength,
    /// Another document in the batch already declares this ID.
    DuplicateId,

    // Platform rules
    /// claude-code `command: true` without `namespace`.
    MissingNamespace,
    /// cursor `auto-attached` activation without `globs`.
    MissingGlobs,
    /// windsurf `characterLimit` above the platform ceiling.
    CharacterLimitExceeded,
    /// github-copilot `priority` outside 1..=10.
    InvalidPriority,
    /// Optional platform feature not configured.
    MissingFeature,

    // Content heuristics
    /// Body shorter than the minimum.
    ContentTooShort,
    /// Body has no markdown headers.
    MissingHeaders,
    /// Body has no fenced code examples.
    MissingExamples,
    /// Estimated size exceeds a size-constrained platform's budget.
    ContentSize,

    // Relationships
    /// `requires` names an ID not present in the batch.
    MissingDependency,
    /// `suggests` names an ID not present in the batch.
    MissingSuggestion,
    /// `supersedes` names an ID not present in the batch.
    MissingSuperseded,

    // Compatibility
    /// Document parsed but failed validation.
    InvalidSchema,
    /// Content likely truncated on a size-constrained platform.
    PlatformTruncation,
    /// cursor `always` activation combined with `globs`.
    ConflictingActivation,
}

impl IssueKind {
    /// The `type` string used in reports and frequency tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::SchemaValidation => "schema_validation",
            Self::CyclicDependency => "cyclic_dependency",
            Self::InvalidId => "invalid_id",
            Self::InvalidVersion => "invalid_version",
            Self::ConflictingRelationships => "conflicting_relationships",
            Self::DescriptionLength => "description_length",
            Self::DuplicateId => "duplicate_id",
            Self::MissingNamespace => "missing_namespace",
            Self::MissingGlobs => "missing_globs",
            Self::CharacterLimitExceeded => "character_limit_exceeded",
            Self::InvalidPriority => "invalid_priority",
            Self::MissingFeature => "missing_feature",
            Self::ContentTooShort => "content_too_short",
            Self::MissingHeaders => "missing_headers",
            Self::MissingExamples => "missing_examples",
            Self::ContentSize => "content_size",
            Self::MissingDependency => "missing_dependency",
            Self::MissingSuggestion => "missing_suggestion",
            Self::MissingSuperseded => "missing_superseded",
            Self::InvalidSchema => "invalid_schema",
            Self::PlatformTruncation => "platform_truncation",
            Self::ConflictingActivation => "conflicting_activation",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding against a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Classification.
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// Severity; only errors affect validity.
    pub severity: Severity,
    /// JSON Pointer into the frontmatter, `/_content` for the body, or empty.
    pub path: String,
    /// Human-readable description.
    pub message: String,
    /// Structured payload (e.g. the offending IDs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ValidationIssue {
    /// Create an issue with an explicit severity.
    pub fn new(
        kind: IssueKind,
        severity: Severity,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            path: path.into(),
            message: message.into(),
            data: None,
        }
    }

    /// Create an error-severity issue.
    pub fn error(kind: IssueKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, path, message)
    }

    /// Create a warning-severity issue.
    pub fn warning(kind: IssueKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, path, message)
    }

    /// Create an info-severity issue.
    pub fn info(kind: IssueKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Info, path, message)
    }

    /// Attach structured data.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether this issue makes a document invalid.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] {}", self.kind, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.kind, self.path, self.message)
        }
    }
}

/// Join JSON Pointer segments, escaping `~` and `/` per RFC 6901.
pub fn pointer(segments: &[&str]) -> String {
    let mut out = String::new();
    for seg in segments {
        out.push('/');
        out.push_str(&seg.replace('~', "~0").replace('/', "~1"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn issue_serializes_kind_as_type() {
        let issue = ValidationIssue::error(IssueKind::MissingGlobs, "/platforms/cursor/globs", "x");
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["type"], "missing_globs");
        assert_eq!(value["severity"], "error");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn serde_names_match_as_str() {
        for kind in [
            IssueKind::ParseError,
            IssueKind::SchemaValidation,
            IssueKind::CyclicDependency,
            IssueKind::ConflictingRelationships,
            IssueKind::CharacterLimitExceeded,
            IssueKind::MissingSuperseded,
            IssueKind::ConflictingActivation,
        ] {
            let value = serde_json::to_value(kind).unwrap();
            assert_eq!(value, json!(kind.as_str()));
        }
    }

    #[test]
    fn data_round_trips() {
        let issue = ValidationIssue::error(IssueKind::ConflictingRelationships, "/requires", "x")
            .with_data(json!(["a", "b"]));
        let back: ValidationIssue =
            serde_json::from_value(serde_json::to_value(&issue).unwrap()).unwrap();
        assert_eq!(back, issue);
    }

    #[test]
    fn only_errors_are_errors() {
        assert!(ValidationIssue::error(IssueKind::InvalidId, "", "").is_error());
        assert!(!ValidationIssue::warning(IssueKind::MissingHeaders, "", "").is_error());
        assert!(!ValidationIssue::info(IssueKind::MissingFeature, "", "").is_error());
    }

    #[test]
    fn display_omits_empty_path() {
        let issue = ValidationIssue::error(IssueKind::ParseError, "", "YAML frontmatter not found");
        assert_eq!(issue.to_string(), "[parse_error] YAML frontmatter not found");
    }

    #[test]
    fn pointer_escapes_segments() {
        assert_eq!(pointer(&["platforms", "claude-code"]), "/platforms/claude-code");
        assert_eq!(pointer(&["a/b", "c~d"]), "/a~1b/c~0d");
        assert_eq!(pointer(&[]), "");
    }
}
