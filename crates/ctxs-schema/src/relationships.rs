//! # Cross-Document Relationships
//!
//! Runs after every document in a batch has been validated on its own.
//! Only documents that were valid at that point take part: they own their
//! IDs, and only their references are resolved.
//!
//! - A later valid document reusing an owned ID gets a `duplicate_id` error.
//! - Unresolved `requires` are errors.
//! - Unresolved `suggests` and `supersedes` are warnings.
//!
//! A reference to an ID that the batch declares only in invalid documents
//! is unresolved too; its message says so.

use std::collections::{HashMap, HashSet};

use serde_json::json;

use ctxs_core::{pointer, IssueKind, ValidationIssue};

use crate::report::ValidationResult;

/// Add relationship issues to `results` in place.
pub fn resolve_relationships(results: &mut [ValidationResult]) {
    let initially_valid: Vec<bool> = results.iter().map(|r| r.valid).collect();

    // ID → index of the first initially-valid document declaring it.
    let mut owners: HashMap<String, usize> = HashMap::new();
    let mut duplicates: Vec<(usize, usize)> = Vec::new();
    for (index, result) in results.iter().enumerate() {
        if !initially_valid[index] {
            continue;
        }
        let Some(id) = result.document_id() else {
            continue;
        };
        match owners.get(id) {
            Some(&owner) => duplicates.push((index, owner)),
            None => {
                owners.insert(id.to_string(), index);
            }
        }
    }

    // IDs declared by any parsed document, valid or not.
    let declared: HashSet<String> = results
        .iter()
        .filter_map(|r| r.document_id())
        .map(str::to_string)
        .collect();

    for (index, owner) in duplicates {
        let owner_path = results[owner].file_path.clone();
        let id = results[index].document_id().unwrap_or_default().to_string();
        results[index].extend([ValidationIssue::error(
            IssueKind::DuplicateId,
            pointer(&["id"]),
            format!("Duplicate ID '{id}' already declared in {owner_path}"),
        )
        .with_data(json!({ "id": id, "firstDeclaredIn": owner_path }))]);
    }

    for index in 0..results.len() {
        if !initially_valid[index] {
            continue;
        }
        let issues = match results[index].schema.as_ref() {
            Some(doc) => reference_issues(&doc.requires, &doc.suggests, &doc.supersedes, |id| {
                if owners.contains_key(id) {
                    Reference::Resolved
                } else if declared.contains(id) {
                    Reference::Invalid
                } else {
                    Reference::Missing
                }
            }),
            None => continue,
        };
        if !issues.is_empty() {
            results[index].extend(issues);
        }
    }
}

/// How a referenced ID resolved within the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reference {
    Resolved,
    /// Declared only by documents that failed validation.
    Invalid,
    Missing,
}

fn describe(noun: &str, dep: &str, reference: Reference) -> String {
    match reference {
        Reference::Invalid => format!("{noun} context '{dep}' exists but is invalid"),
        _ => format!("{noun} context '{dep}' not found"),
    }
}

fn reference_issues(
    requires: &[String],
    suggests: &[String],
    supersedes: &[String],
    lookup: impl Fn(&str) -> Reference,
) -> Vec<ValidationIssue> {
    let unresolved = |ids: &[String]| -> Vec<(String, Reference)> {
        ids.iter()
            .map(|id| (id.clone(), lookup(id)))
            .filter(|(_, r)| *r != Reference::Resolved)
            .collect()
    };

    let mut issues = Vec::new();
    for (dep, reference) in unresolved(requires) {
        issues.push(
            ValidationIssue::error(
                IssueKind::MissingDependency,
                pointer(&["requires"]),
                describe("Required", &dep, reference),
            )
            .with_data(json!({ "id": dep, "invalid": reference == Reference::Invalid })),
        );
    }
    for (dep, reference) in unresolved(suggests) {
        issues.push(
            ValidationIssue::warning(
                IssueKind::MissingSuggestion,
                pointer(&["suggests"]),
                describe("Suggested", &dep, reference),
            )
            .with_data(json!({ "id": dep, "invalid": reference == Reference::Invalid })),
        );
    }
    for (dep, reference) in unresolved(supersedes) {
        issues.push(
            ValidationIssue::warning(
                IssueKind::MissingSuperseded,
                pointer(&["supersedes"]),
                describe("Superseded", &dep, reference),
            )
            .with_data(json!({ "id": dep, "invalid": reference == Reference::Invalid })),
        );
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxs_core::{ContextDocument, DocumentError};
    use serde_json::Value;

    fn result(path: &str, fm: Value) -> ValidationResult {
        let doc = ContextDocument::from_parts(fm.as_object().cloned().unwrap(), String::new());
        ValidationResult::from_issues(path, doc, vec![])
    }

    #[test]
    fn missing_requirement_invalidates() {
        let mut results = vec![result("a", json!({"id": "a", "requires": ["ghost"]}))];
        resolve_relationships(&mut results);
        assert!(!results[0].valid);
        assert_eq!(results[0].errors[0].kind, IssueKind::MissingDependency);
        assert!(results[0].errors[0].message.contains("ghost"));
    }

    #[test]
    fn missing_suggestion_and_supersedes_only_warn() {
        let mut results = vec![result(
            "a",
            json!({"id": "a", "suggests": ["s"], "supersedes": ["old"]}),
        )];
        resolve_relationships(&mut results);
        assert!(results[0].valid);
        assert_eq!(results[0].warnings.len(), 2);
        assert!(results[0].has_issue(IssueKind::MissingSuggestion));
        assert!(results[0].has_issue(IssueKind::MissingSuperseded));
    }

    #[test]
    fn resolved_references_are_silent() {
        let mut results = vec![
            result("a", json!({"id": "a", "requires": ["b"], "suggests": ["b"]})),
            result("b", json!({"id": "b"})),
        ];
        resolve_relationships(&mut results);
        assert!(results.iter().all(|r| r.valid && r.warnings.is_empty()));
    }

    #[test]
    fn invalid_documents_neither_own_ids_nor_get_checked() {
        let mut broken = result("b", json!({"id": "b", "requires": ["nowhere"]}));
        broken.extend([ValidationIssue::error(IssueKind::InvalidVersion, "/version", "bad")]);
        let mut results = vec![
            result("a", json!({"id": "a", "requires": ["b"]})),
            broken,
        ];
        resolve_relationships(&mut results);
        assert!(results[0].has_issue(IssueKind::MissingDependency));
        assert_eq!(
            results[0].errors[0].message,
            "Required context 'b' exists but is invalid"
        );
        assert_eq!(results[0].errors[0].data.as_ref().unwrap()["invalid"], true);
        assert_eq!(results[1].errors.len(), 1);
    }

    #[test]
    fn parse_failures_are_skipped() {
        let mut results = vec![ValidationResult::parse_failure(
            "x",
            &DocumentError::MissingFrontmatter,
        )];
        resolve_relationships(&mut results);
        assert_eq!(results[0].errors.len(), 1);
    }

    #[test]
    fn duplicate_id_flags_later_document() {
        let mut results = vec![
            result("first.yaml", json!({"id": "dup"})),
            result("second.yaml", json!({"id": "dup"})),
        ];
        resolve_relationships(&mut results);
        assert!(results[0].valid);
        assert!(!results[1].valid);
        let issue = &results[1].errors[0];
        assert_eq!(issue.kind, IssueKind::DuplicateId);
        assert!(issue.message.contains("first.yaml"));
    }
}
