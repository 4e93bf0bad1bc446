//! # Scores, Tiers and Cross-Platform Checks
//!
//! A document's score is the share of its declared platforms marked
//! `compatible: true`, as a rounded percentage. Documents without platforms
//! score 0.

use serde::Serialize;
use serde_json::json;

use ctxs_core::{
    pointer, ContextDocument, CursorActivation, IssueKind, PlatformConfig, PlatformKind,
    RuleLimits, ScoreTiers, ValidationIssue, CONTENT_FIELD,
};

/// Compatibility tier of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// `score >= tiers.high`.
    High,
    /// `tiers.medium <= score < tiers.high`.
    Medium,
    /// `score < tiers.medium`.
    Low,
}

impl Tier {
    /// Bucket a score.
    pub fn from_score(score: u8, tiers: &ScoreTiers) -> Self {
        if score >= tiers.high {
            Tier::High
        } else if score >= tiers.medium {
            Tier::Medium
        } else {
            Tier::Low
        }
    }
}

/// `round(compatible / declared * 100)`, 0 when nothing is declared.
pub fn compatibility_score(doc: &ContextDocument) -> u8 {
    let declared = doc.platforms.len();
    if declared == 0 {
        return 0;
    }
    let compatible = doc
        .platforms
        .values()
        .filter(|config| config.is_compatible())
        .count();
    // compatible <= declared, so the result is within 0..=100.
    ((compatible as f64 / declared as f64) * 100.0).round() as u8
}

/// Issues arising from how platform settings interact with the document.
///
/// Each issue carries the platform it concerns under `data.platform`.
pub fn cross_platform_issues(doc: &ContextDocument, limits: &RuleLimits) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if doc.is_compatible_with(&PlatformKind::Windsurf) {
        let estimated = doc.estimated_size(limits.size_overhead);
        if estimated > limits.windsurf_character_limit {
            issues.push(
                ValidationIssue::warning(
                    IssueKind::PlatformTruncation,
                    pointer(&[CONTENT_FIELD]),
                    format!(
                        "Content may be truncated on Windsurf: estimated {estimated} characters, limit {}",
                        limits.windsurf_character_limit
                    ),
                )
                .with_data(json!({
                    "platform": PlatformKind::Windsurf.as_str(),
                    "estimatedSize": estimated,
                    "limit": limits.windsurf_character_limit,
                })),
            );
        }
    }

    if let Some(PlatformConfig::Cursor(cursor)) = doc.platform(&PlatformKind::Cursor) {
        if cursor.activation == Some(CursorActivation::Always) && cursor.globs.is_some() {
            issues.push(
                ValidationIssue::warning(
                    IssueKind::ConflictingActivation,
                    pointer(&["platforms", "cursor", "globs"]),
                    "Cursor 'always' activation ignores globs; the globs have no effect",
                )
                .with_data(json!({ "platform": PlatformKind::Cursor.as_str() })),
            );
        }
    }

    issues
}

/// The platform a cross-platform issue concerns.
pub fn issue_platform(issue: &ValidationIssue) -> Option<&str> {
    issue.data.as_ref()?.get("platform")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Value;

    fn doc(fm: Value, content: &str) -> ContextDocument {
        ContextDocument::from_parts(fm.as_object().cloned().unwrap(), content.to_string())
    }

    #[test]
    fn score_examples() {
        let none = doc(json!({"id": "a"}), "");
        let half = doc(
            json!({"platforms": {"cursor": {"compatible": true}, "windsurf": {"compatible": false}}}),
            "",
        );
        let third = doc(
            json!({"platforms": {"a": {"compatible": true}, "b": {"compatible": false}, "c": {"compatible": false}}}),
            "",
        );
        assert_eq!(compatibility_score(&none), 0);
        assert_eq!(compatibility_score(&half), 50);
        assert_eq!(compatibility_score(&third), 33);
    }

    #[test]
    fn tier_boundaries() {
        let tiers = ScoreTiers::default();
        assert_eq!(Tier::from_score(100, &tiers), Tier::High);
        assert_eq!(Tier::from_score(80, &tiers), Tier::High);
        assert_eq!(Tier::from_score(79, &tiers), Tier::Medium);
        assert_eq!(Tier::from_score(50, &tiers), Tier::Medium);
        assert_eq!(Tier::from_score(49, &tiers), Tier::Low);
        assert_eq!(Tier::from_score(0, &tiers), Tier::Low);
    }

    #[test]
    fn truncation_needs_compatible_windsurf() {
        let long = "x".repeat(6000);
        let on = doc(json!({"platforms": {"windsurf": {"compatible": true}}}), &long);
        let off = doc(json!({"platforms": {"windsurf": {"compatible": false}}}), &long);
        let limits = RuleLimits::default();
        let issues = cross_platform_issues(&on, &limits);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::PlatformTruncation);
        assert_eq!(issue_platform(&issues[0]), Some("windsurf"));
        assert!(cross_platform_issues(&off, &limits).is_empty());
    }

    #[test]
    fn always_activation_with_globs_conflicts() {
        let with = doc(
            json!({"platforms": {"cursor": {"compatible": true, "activation": "always", "globs": ["*.rs"]}}}),
            "",
        );
        let without = doc(
            json!({"platforms": {"cursor": {"compatible": true, "activation": "always"}}}),
            "",
        );
        let limits = RuleLimits::default();
        let issues = cross_platform_issues(&with, &limits);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::ConflictingActivation);
        assert!(cross_platform_issues(&without, &limits).is_empty());
    }

    proptest! {
        /// Scores stay within 0..=100 and hit 100 exactly when every platform is compatible.
        #[test]
        fn score_bounds(flags in proptest::collection::vec(any::<bool>(), 0..8)) {
            let platforms: serde_json::Map<String, Value> = flags
                .iter()
                .enumerate()
                .map(|(i, c)| (format!("p{i}"), json!({"compatible": c})))
                .collect();
            let d = doc(json!({"platforms": platforms}), "");
            let score = compatibility_score(&d);
            prop_assert!(score <= 100);
            let all = !flags.is_empty() && flags.iter().all(|c| *c);
            prop_assert_eq!(score == 100, all);
        }
    }
}
