//! Integration tests: compatibility checks over directories on disk.

use std::path::Path;

use ctxs_compat::{CompatError, CompatibilityChecker, Tier};
use ctxs_core::{IssueKind, ValidatorConfig};

const BODY: &str = "# Guide\n\nExplain the conventions this context enforces in detail.\n\n```sh\ncargo fmt\n```";

fn write_doc(dir: &Path, id: &str, platforms: &str) {
    let source = format!(
        "---\nid: {id}\ntitle: {id}\ndescription: Compatibility fixture {id}.\nversion: 2.1.0\ncategory: test\nplatforms:\n{platforms}---\n{BODY}\n"
    );
    std::fs::write(dir.join(format!("{id}.yaml")), source).unwrap();
}

#[test]
fn directory_report_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(
        dir.path(),
        "everywhere",
        "  claude-code:\n    compatible: true\n    memory: true\n  cursor:\n    compatible: true\n    activation: agent-requested\n  windsurf:\n    compatible: true\n  github-copilot:\n    compatible: true\n    priority: 5\n",
    );
    write_doc(
        dir.path(),
        "cursor-only",
        "  cursor:\n    compatible: true\n    activation: auto-attached\n    globs: ['**/*.rs']\n  windsurf:\n    compatible: false\n",
    );
    write_doc(
        dir.path(),
        "nowhere",
        "  windsurf:\n    compatible: false\n  zed:\n    compatible: false\n",
    );
    std::fs::write(dir.path().join("broken.yaml"), "no frontmatter here\n").unwrap();

    let report = CompatibilityChecker::new()
        .unwrap()
        .check_compatibility(dir.path())
        .unwrap();

    assert_eq!(report.summary.total_schemas, 3);
    assert_eq!(report.summary.errors.len(), 1);
    assert_eq!(report.summary.errors[0].kind, IssueKind::ParseError);
    assert!(report.has_errors());

    assert_eq!(report.schema("everywhere").unwrap().tier, Tier::High);
    assert_eq!(report.schema("cursor-only").unwrap().tier, Tier::Medium);
    assert_eq!(report.schema("nowhere").unwrap().tier, Tier::Low);

    let windsurf = &report.platforms["windsurf"];
    assert_eq!(windsurf.declared, 3);
    assert_eq!(windsurf.compatible, 1);
    assert_eq!(windsurf.corpus_total, 3);
    assert_eq!(windsurf.compatibility_rate, 33.3);

    let zed = &report.platforms["zed"];
    assert!(zed.features.supported.is_empty());
    assert!(zed.features.limitations.is_empty());
}

#[test]
fn windsurf_truncation_flagged_for_valid_document() {
    let dir = tempfile::tempdir().unwrap();
    let big = format!("{BODY}\n\n{}", "word ".repeat(1300));
    let source = format!(
        "---\nid: big\ntitle: Big\ndescription: A very large context document.\nversion: 1.0.0\ncategory: test\nplatforms:\n  windsurf:\n    compatible: true\n---\n{big}\n"
    );
    std::fs::write(dir.path().join("big.yaml"), source).unwrap();

    let report = CompatibilityChecker::new()
        .unwrap()
        .check_compatibility(dir.path())
        .unwrap();
    let big = report.schema("big").expect("valid despite size");
    assert_eq!(big.cross_platform_issues.len(), 1);
    assert_eq!(big.cross_platform_issues[0].kind, IssueKind::PlatformTruncation);
    assert!(!report.has_errors());
}

#[test]
fn invalid_document_recorded_as_invalid_schema() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(
        dir.path(),
        "bad-priority",
        "  github-copilot:\n    compatible: true\n    priority: 42\n",
    );
    let report = CompatibilityChecker::new()
        .unwrap()
        .check_compatibility(dir.path())
        .unwrap();
    assert_eq!(report.summary.total_schemas, 0);
    assert_eq!(report.summary.errors[0].kind, IssueKind::InvalidSchema);
    assert!(report.summary.errors[0]
        .errors
        .iter()
        .any(|i| i.kind == IssueKind::InvalidPriority));
}

#[test]
fn configured_tiers_are_used() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(
        dir.path(),
        "half",
        "  cursor:\n    compatible: true\n  windsurf:\n    compatible: false\n",
    );
    let mut config = ValidatorConfig::default();
    config.tiers.high = 50;
    config.tiers.medium = 20;
    let report = CompatibilityChecker::with_config(config)
        .unwrap()
        .check_compatibility(dir.path())
        .unwrap();
    assert_eq!(report.schema("half").unwrap().tier, Tier::High);
}

#[test]
fn missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = CompatibilityChecker::new()
        .unwrap()
        .check_compatibility(&dir.path().join("absent"))
        .unwrap_err();
    assert!(matches!(err, CompatError::Discovery(_)));
}

#[test]
fn report_serializes_camel_case() {
    let dir = tempfile::tempdir().unwrap();
    write_doc(dir.path(), "one", "  cursor:\n    compatible: true\n");
    let report = CompatibilityChecker::new()
        .unwrap()
        .check_compatibility(dir.path())
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["summary"]["totalSchemas"], 1);
    assert_eq!(value["platforms"]["cursor"]["compatibilityRate"], 100.0);
    assert_eq!(value["schemas"][0]["tier"], "high");
}

#[test]
fn sample_contexts_have_no_errors() {
    let mut root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.pop();
    root.pop();
    let report = CompatibilityChecker::new()
        .unwrap()
        .check_compatibility(&root.join("contexts"))
        .unwrap();
    assert!(report.summary.errors.is_empty(), "{:?}", report.summary.errors);
    assert!(!report.has_errors());
    assert!(report.platforms.contains_key("cursor"));
    assert_eq!(report.schema("error-handling-legacy").unwrap().tier, Tier::Medium);
}
