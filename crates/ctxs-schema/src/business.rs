//! # Business and Content Rules
//!
//! Checks that go beyond structural schema conformance:
//!
//! - dependency cycles, looked up in a batch-wide [`CycleReport`]
//! - platform field rules from the shared [`PlatformRuleRegistry`]
//! - ID and version formats
//! - overlap between `requires` and `conflicts`
//! - description length bounds
//!
//! Content heuristics (length, headers, code examples, Windsurf size budget)
//! are warnings only and never affect validity.

use serde_json::json;

use ctxs_core::{
    is_kebab_case_id, is_semantic_version, pointer, CycleReport, ContextDocument, IssueKind,
    PlatformKind, PlatformRuleRegistry, RuleLimits, Severity, ValidationIssue, CONTENT_FIELD,
};

/// Business-rule issues for one document.
///
/// Info-severity platform findings are advisory for compatibility scoring
/// and are not reported here.
pub fn business_issues(
    doc: &ContextDocument,
    cycles: &CycleReport,
    registry: &PlatformRuleRegistry,
    limits: &RuleLimits,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(cycle) = cycles.cycle_of(&doc.id) {
        issues.push(
            ValidationIssue::error(
                IssueKind::CyclicDependency,
                pointer(&["requires"]),
                format!(
                    "Cyclic dependency detected involving: {}",
                    cycle.join(", ")
                ),
            )
            .with_data(json!({ "cycle": cycle })),
        );
    }

    issues.extend(
        registry
            .check_document(doc, limits)
            .into_iter()
            .filter(|issue| issue.severity != Severity::Info),
    );

    if !doc.id.is_empty() && !is_kebab_case_id(&doc.id) {
        issues.push(
            ValidationIssue::error(
                IssueKind::InvalidId,
                pointer(&["id"]),
                format!(
                    "ID '{}' must be kebab-case (lowercase letters, digits and hyphens)",
                    doc.id
                ),
            )
            .with_data(json!({ "id": doc.id })),
        );
    }

    if !doc.version.is_empty() && !is_semantic_version(&doc.version) {
        issues.push(
            ValidationIssue::error(
                IssueKind::InvalidVersion,
                pointer(&["version"]),
                format!("Version '{}' is not a valid semantic version", doc.version),
            )
            .with_data(json!({ "version": doc.version })),
        );
    }

    let overlap = conflicting_relationships(doc);
    if !overlap.is_empty() {
        issues.push(
            ValidationIssue::error(
                IssueKind::ConflictingRelationships,
                "",
                format!(
                    "Contexts cannot both require and conflict with: {}",
                    overlap.join(", ")
                ),
            )
            .with_data(json!({ "conflicting": overlap })),
        );
    }

    if let Some(issue) = description_length(doc, limits) {
        issues.push(issue);
    }

    issues
}

/// IDs present in both `requires` and `conflicts`, in `requires` order.
pub fn conflicting_relationships(doc: &ContextDocument) -> Vec<String> {
    let mut overlap: Vec<String> = Vec::new();
    for id in &doc.requires {
        if doc.conflicts.contains(id) && !overlap.contains(id) {
            overlap.push(id.clone());
        }
    }
    overlap
}

fn description_length(doc: &ContextDocument, limits: &RuleLimits) -> Option<ValidationIssue> {
    if doc.description.is_empty() {
        return None;
    }
    let len = doc.description.chars().count();
    if len >= limits.description_min && len <= limits.description_max {
        return None;
    }
    Some(
        ValidationIssue::warning(
            IssueKind::DescriptionLength,
            pointer(&["description"]),
            format!(
                "Description is {len} characters; expected between {} and {}",
                limits.description_min, limits.description_max
            ),
        )
        .with_data(json!({
            "length": len,
            "min": limits.description_min,
            "max": limits.description_max,
        })),
    )
}

/// Content-heuristic warnings for one document.
pub fn content_issues(doc: &ContextDocument, limits: &RuleLimits) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let content_path = pointer(&[CONTENT_FIELD]);
    let length = doc.content.chars().count();

    if length < limits.min_content_length {
        issues.push(
            ValidationIssue::warning(
                IssueKind::ContentTooShort,
                content_path.clone(),
                format!(
                    "Content is {length} characters; at least {} recommended",
                    limits.min_content_length
                ),
            )
            .with_data(json!({ "length": length, "min": limits.min_content_length })),
        );
    }

    if !doc.content.contains('#') {
        issues.push(ValidationIssue::warning(
            IssueKind::MissingHeaders,
            content_path.clone(),
            "Content has no markdown headers",
        ));
    }

    if !doc.content.contains("```") {
        issues.push(ValidationIssue::warning(
            IssueKind::MissingExamples,
            content_path.clone(),
            "Content has no fenced code examples",
        ));
    }

    if doc.is_compatible_with(&PlatformKind::Windsurf) {
        let estimated = doc.estimated_size(limits.size_overhead);
        if estimated > limits.windsurf_character_limit {
            issues.push(
                ValidationIssue::warning(
                    IssueKind::ContentSize,
                    content_path,
                    format!(
                        "Estimated size {estimated} exceeds the Windsurf limit of {} characters",
                        limits.windsurf_character_limit
                    ),
                )
                .with_data(json!({
                    "estimatedSize": estimated,
                    "limit": limits.windsurf_character_limit,
                    "platform": PlatformKind::Windsurf.as_str(),
                })),
            );
        }
    }

    issues
}
