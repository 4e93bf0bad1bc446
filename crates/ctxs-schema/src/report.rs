//! # Validation Reports
//!
//! Per-document [`ValidationResult`]s and the batch-level
//! [`ValidationSummary`]. Serialized field names match the JSON report
//! format: `valid`, `filePath`, `schema`, `errors`, `warnings`.

use std::collections::BTreeMap;

use serde::Serialize;

use ctxs_core::{ContextDocument, DocumentError, IssueKind, Severity, ValidationIssue};

/// Outcome of validating one document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// `true` iff `errors` is empty.
    pub valid: bool,
    /// Path or label of the source.
    pub file_path: String,
    /// The parsed document; absent when parsing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ContextDocument>,
    /// Error-severity issues.
    pub errors: Vec<ValidationIssue>,
    /// Warning and info issues.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Build a result from a parsed document and its issues.
    pub fn from_issues(
        file_path: impl Into<String>,
        document: ContextDocument,
        issues: impl IntoIterator<Item = ValidationIssue>,
    ) -> Self {
        let mut result = Self {
            valid: true,
            file_path: file_path.into(),
            schema: Some(document),
            errors: Vec::new(),
            warnings: Vec::new(),
        };
        result.extend(issues);
        result
    }

    /// A result for a source that could not be read or parsed.
    pub fn parse_failure(file_path: impl Into<String>, error: &DocumentError) -> Self {
        Self {
            valid: false,
            file_path: file_path.into(),
            schema: None,
            errors: vec![ValidationIssue::error(
                IssueKind::ParseError,
                "",
                error.to_string(),
            )],
            warnings: Vec::new(),
        }
    }

    /// Append issues, routing by severity and recomputing `valid`.
    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        for issue in issues {
            match issue.severity {
                Severity::Error => self.errors.push(issue),
                Severity::Warning | Severity::Info => self.warnings.push(issue),
            }
        }
        self.valid = self.errors.is_empty();
    }

    /// The document ID, if the document parsed and declares one.
    pub fn document_id(&self) -> Option<&str> {
        self.schema
            .as_ref()
            .map(|doc| doc.id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// Whether any issue of `kind` was recorded.
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.errors
            .iter()
            .chain(&self.warnings)
            .any(|issue| issue.kind == kind)
    }

    /// Whether this result is a parse failure.
    pub fn is_parse_failure(&self) -> bool {
        self.schema.is_none()
    }
}

/// Aggregate counts over a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Documents processed.
    pub total: usize,
    /// Documents with no errors.
    pub valid: usize,
    /// Documents with at least one error.
    pub invalid: usize,
    /// Total error count.
    pub errors: usize,
    /// Total warning count.
    pub warnings: usize,
    /// Error frequency by issue type.
    pub error_types: BTreeMap<String, usize>,
    /// Warning frequency by issue type.
    pub warning_types: BTreeMap<String, usize>,
}

impl ValidationSummary {
    /// Summarize a set of results.
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            if result.valid {
                summary.valid += 1;
            } else {
                summary.invalid += 1;
            }
            summary.errors += result.errors.len();
            summary.warnings += result.warnings.len();
            for issue in &result.errors {
                *summary
                    .error_types
                    .entry(issue.kind.as_str().to_string())
                    .or_default() += 1;
            }
            for issue in &result.warnings {
                *summary
                    .warning_types
                    .entry(issue.kind.as_str().to_string())
                    .or_default() += 1;
            }
        }
        summary
    }
}

/// Results and summary for a batch of documents.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// One entry per input, in input order.
    pub results: Vec<ValidationResult>,
    /// Aggregate counts.
    pub summary: ValidationSummary,
}

impl BatchReport {
    /// Wrap results, computing the summary.
    pub fn new(results: Vec<ValidationResult>) -> Self {
        let summary = ValidationSummary::from_results(&results);
        Self { results, summary }
    }

    /// Whether any error-severity issue exists.
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Results whose documents declare `platform`, plus every parse
    /// failure, which belongs to no platform and must not be filtered away.
    pub fn for_platform<'a>(&'a self, platform: &'a str) -> impl Iterator<Item = &'a ValidationResult> {
        self.results.iter().filter(move |r| {
            r.schema
                .as_ref()
                .map_or(true, |doc| doc.platforms.contains_key(platform))
        })
    }
}
