//! # Compatibility Reports

use std::collections::BTreeMap;

use serde::Serialize;

use ctxs_core::{IssueKind, PlatformFeatures, Severity, ValidationIssue};

use crate::score::Tier;

/// A rule issue attributed to a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformIssue {
    /// ID of the document the issue belongs to.
    pub schema_id: String,
    /// Source file of the document.
    pub file_path: String,
    /// The issue itself.
    #[serde(flatten)]
    pub issue: ValidationIssue,
}

/// Per-platform compatibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformReport {
    /// Valid documents that mention the platform.
    pub declared: usize,
    /// Documents marked `compatible: true`.
    pub compatible: usize,
    /// Documents that mention the platform without `compatible: true`.
    pub incompatible: usize,
    /// Valid documents in the whole corpus.
    pub corpus_total: usize,
    /// `compatible / declared` as a percentage with one decimal.
    pub compatibility_rate: f64,
    /// Rule issues for this platform, all severities.
    pub issues: Vec<PlatformIssue>,
    /// Static feature description.
    pub features: PlatformFeatures,
}

/// Per-document compatibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaCompatibility {
    /// Document ID.
    pub id: String,
    /// Source file.
    pub file_path: String,
    /// 0–100.
    pub score: u8,
    /// Tier derived from `score`.
    pub tier: Tier,
    /// Platform name → `compatible` flag.
    pub platforms: BTreeMap<String, bool>,
    /// Rule issues across this document's platforms.
    pub issues: Vec<ValidationIssue>,
    /// Issues from interactions between platform settings and content.
    pub cross_platform_issues: Vec<ValidationIssue>,
}

/// A document excluded from analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedDocument {
    /// Source file.
    pub file_path: String,
    /// `parse_error` or `invalid_schema`.
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// One-line reason.
    pub message: String,
    /// The validation errors behind the exclusion.
    pub errors: Vec<ValidationIssue>,
}

/// Document counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    /// Score at or above the high boundary.
    pub high: usize,
    /// Score between the medium and high boundaries.
    pub medium: usize,
    /// Score below the medium boundary.
    pub low: usize,
}

impl TierCounts {
    fn add(&mut self, tier: Tier) {
        match tier {
            Tier::High => self.high += 1,
            Tier::Medium => self.medium += 1,
            Tier::Low => self.low += 1,
        }
    }
}

/// Rate and issue count for one platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSummary {
    /// Same as [`PlatformReport::compatibility_rate`].
    pub compatibility_rate: f64,
    /// Number of rule issues.
    pub issues: usize,
}

/// Aggregate view of a compatibility run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilitySummary {
    /// Valid documents analyzed.
    pub total_schemas: usize,
    /// Documents per tier.
    pub tiers: TierCounts,
    /// Per-platform rate and issue count.
    pub platforms: BTreeMap<String, PlatformSummary>,
    /// Issue frequency by type.
    pub issues_by_type: BTreeMap<String, usize>,
    /// Issue frequency by severity.
    pub issues_by_severity: BTreeMap<String, usize>,
    /// Documents excluded because they failed to parse or validate.
    pub errors: Vec<ExcludedDocument>,
}

impl CompatibilitySummary {
    /// Whether any error-severity issue or any excluded document exists.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
            || self
                .issues_by_severity
                .get(Severity::Error.as_str())
                .is_some_and(|n| *n > 0)
    }

    pub(crate) fn record_schema(&mut self, schema: &SchemaCompatibility) {
        self.tiers.add(schema.tier);
        for issue in schema.issues.iter().chain(&schema.cross_platform_issues) {
            *self
                .issues_by_type
                .entry(issue.kind.as_str().to_string())
                .or_default() += 1;
            *self
                .issues_by_severity
                .entry(issue.severity.as_str().to_string())
                .or_default() += 1;
        }
    }
}

/// Full result of a compatibility run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityReport {
    /// Platform name → report.
    pub platforms: BTreeMap<String, PlatformReport>,
    /// One entry per analyzed document.
    pub schemas: Vec<SchemaCompatibility>,
    /// Aggregates.
    pub summary: CompatibilitySummary,
}

impl CompatibilityReport {
    /// Whether the run found anything error-severity.
    pub fn has_errors(&self) -> bool {
        self.summary.has_errors()
    }

    /// Look up a document's entry by ID.
    pub fn schema(&self, id: &str) -> Option<&SchemaCompatibility> {
        self.schemas.iter().find(|s| s.id == id)
    }
}

/// `part / whole` as a percentage rounded to one decimal; 0 when `whole` is 0.
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    ((part as f64 / whole as f64) * 1000.0).round() / 10.0
}
