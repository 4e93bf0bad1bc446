//! # Platform Rule Registry
//!
//! One table of per-platform field rules shared by schema validation and
//! compatibility checking. A rule is a pure function of the platform entry,
//! the document it belongs to, and the configured limits.
//!
//! Rules only run for platforms the document declares `compatible: true`.
//! Platform names without registered rules (the generic fallback) produce
//! no issues.
//!
//! | Platform | Rule | Type | Severity |
//! |---|---|---|---|
//! | claude-code | `command: true` without `namespace` | `missing_namespace` | warning |
//! | claude-code | no `memory` declared | `missing_feature` | info |
//! | cursor | `auto-attached` without non-empty `globs` | `missing_globs` | error |
//! | windsurf | `characterLimit` above the budget | `character_limit_exceeded` | warning |
//! | github-copilot | `priority` outside 1..=10 | `invalid_priority` | error |

use std::collections::BTreeMap;
use std::fmt;

use serde_json::json;

use crate::config::RuleLimits;
use crate::document::ContextDocument;
use crate::issue::{pointer, IssueKind, ValidationIssue};
use crate::platform::{CursorActivation, PlatformConfig, PlatformKind};

/// A platform field rule.
pub type PlatformRule = fn(&PlatformConfig, &ContextDocument, &RuleLimits) -> Vec<ValidationIssue>;

/// Valid github-copilot priority range.
pub const COPILOT_PRIORITY_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10.0;

/// Platform name → rules.
#[derive(Clone)]
pub struct PlatformRuleRegistry {
    rules: BTreeMap<String, Vec<PlatformRule>>,
}

impl fmt::Debug for PlatformRuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .rules
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.len()))
            .collect();
        f.debug_struct("PlatformRuleRegistry")
            .field("rules", &counts)
            .finish()
    }
}

impl Default for PlatformRuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PlatformRuleRegistry {
    /// A registry with no rules.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// The built-in rule table.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(PlatformKind::ClaudeCode.as_str(), claude_code_namespace);
        registry.register(PlatformKind::ClaudeCode.as_str(), claude_code_memory);
        registry.register(PlatformKind::Cursor.as_str(), cursor_globs);
        registry.register(PlatformKind::Windsurf.as_str(), windsurf_character_limit);
        registry.register(PlatformKind::GitHubCopilot.as_str(), copilot_priority);
        registry
    }

    /// Add a rule for a platform name.
    pub fn register(&mut self, platform: &str, rule: PlatformRule) {
        self.rules.entry(platform.to_string()).or_default().push(rule);
    }

    /// Platform names with at least one rule.
    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Run the rules for one platform entry. Incompatible entries yield nothing.
    pub fn check_platform(
        &self,
        name: &str,
        config: &PlatformConfig,
        doc: &ContextDocument,
        limits: &RuleLimits,
    ) -> Vec<ValidationIssue> {
        if !config.is_compatible() {
            return Vec::new();
        }
        self.rules
            .get(name)
            .map(|rules| {
                rules
                    .iter()
                    .flat_map(|rule| rule(config, doc, limits))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Run the rules for every compatible platform of a document.
    pub fn check_document(&self, doc: &ContextDocument, limits: &RuleLimits) -> Vec<ValidationIssue> {
        doc.platforms
            .iter()
            .flat_map(|(name, config)| self.check_platform(name, config, doc, limits))
            .collect()
    }
}

fn claude_code_namespace(
    config: &PlatformConfig,
    _doc: &ContextDocument,
    _limits: &RuleLimits,
) -> Vec<ValidationIssue> {
    let PlatformConfig::ClaudeCode(c) = config else {
        return Vec::new();
    };
    let has_namespace = c.namespace.as_deref().is_some_and(|ns| !ns.is_empty());
    if c.command == Some(true) && !has_namespace {
        return vec![ValidationIssue::warning(
            IssueKind::MissingNamespace,
            pointer(&["platforms", "claude-code", "namespace"]),
            "Claude Code commands should declare a namespace",
        )];
    }
    Vec::new()
}

fn claude_code_memory(
    config: &PlatformConfig,
    _doc: &ContextDocument,
    _limits: &RuleLimits,
) -> Vec<ValidationIssue> {
    let PlatformConfig::ClaudeCode(c) = config else {
        return Vec::new();
    };
    if c.memory.is_none() {
        return vec![ValidationIssue::info(
            IssueKind::MissingFeature,
            pointer(&["platforms", "claude-code", "memory"]),
            "Claude Code memory integration is not configured",
        )
        .with_data(json!({"feature": "memory"}))];
    }
    Vec::new()
}

fn cursor_globs(
    config: &PlatformConfig,
    _doc: &ContextDocument,
    _limits: &RuleLimits,
) -> Vec<ValidationIssue> {
    let PlatformConfig::Cursor(c) = config else {
        return Vec::new();
    };
    let has_globs = c.globs.as_ref().is_some_and(|g| !g.is_empty());
    if c.activation == Some(CursorActivation::AutoAttached) && !has_globs {
        return vec![ValidationIssue::error(
            IssueKind::MissingGlobs,
            pointer(&["platforms", "cursor", "globs"]),
            "Cursor auto-attached activation requires non-empty globs",
        )];
    }
    Vec::new()
}

fn windsurf_character_limit(
    config: &PlatformConfig,
    _doc: &ContextDocument,
    limits: &RuleLimits,
) -> Vec<ValidationIssue> {
    let PlatformConfig::Windsurf(c) = config else {
        return Vec::new();
    };
    match c.character_limit {
        Some(limit) if limit > limits.windsurf_character_limit as f64 => {
            vec![ValidationIssue::warning(
                IssueKind::CharacterLimitExceeded,
                pointer(&["platforms", "windsurf", "characterLimit"]),
                format!(
                    "Windsurf characterLimit {limit} exceeds the platform maximum of {}",
                    limits.windsurf_character_limit
                ),
            )
            .with_data(json!({"characterLimit": limit, "max": limits.windsurf_character_limit}))]
        }
        _ => Vec::new(),
    }
}

fn copilot_priority(
    config: &PlatformConfig,
    _doc: &ContextDocument,
    _limits: &RuleLimits,
) -> Vec<ValidationIssue> {
    let PlatformConfig::GitHubCopilot(c) = config else {
        return Vec::new();
    };
    match c.priority {
        Some(priority) if !COPILOT_PRIORITY_RANGE.contains(&priority) => {
            vec![ValidationIssue::error(
                IssueKind::InvalidPriority,
                pointer(&["platforms", "github-copilot", "priority"]),
                format!("GitHub Copilot priority {priority} must be between 1 and 10"),
            )
            .with_data(json!({"priority": priority}))]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;
    use serde_json::Value;

    fn doc_with(platforms: Value) -> ContextDocument {
        let fm = json!({"id": "x", "platforms": platforms});
        ContextDocument::from_parts(fm.as_object().cloned().unwrap(), String::new())
    }

    fn kinds(issues: &[ValidationIssue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn cursor_auto_attached_without_globs_is_one_error() {
        let doc = doc_with(json!({"cursor": {"compatible": true, "activation": "auto-attached"}}));
        let issues = PlatformRuleRegistry::builtin().check_document(&doc, &RuleLimits::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingGlobs);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("globs"));
    }

    #[test]
    fn cursor_empty_globs_still_an_error() {
        let doc = doc_with(json!({"cursor": {"compatible": true, "activation": "auto-attached", "globs": []}}));
        let issues = PlatformRuleRegistry::builtin().check_document(&doc, &RuleLimits::default());
        assert_eq!(kinds(&issues), vec![IssueKind::MissingGlobs]);
    }

    #[test]
    fn cursor_with_globs_passes() {
        let doc = doc_with(json!({"cursor": {"compatible": true, "activation": "auto-attached", "globs": ["**/*.ts"]}}));
        let issues = PlatformRuleRegistry::builtin().check_document(&doc, &RuleLimits::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn incompatible_platforms_are_skipped() {
        let doc = doc_with(json!({
            "cursor": {"compatible": false, "activation": "auto-attached"},
            "github-copilot": {"compatible": false, "priority": 99}
        }));
        let issues = PlatformRuleRegistry::builtin().check_document(&doc, &RuleLimits::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn claude_code_command_without_namespace_warns() {
        let doc = doc_with(json!({"claude-code": {"compatible": true, "command": true, "memory": true}}));
        let issues = PlatformRuleRegistry::builtin().check_document(&doc, &RuleLimits::default());
        assert_eq!(kinds(&issues), vec![IssueKind::MissingNamespace]);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn claude_code_missing_memory_is_info() {
        let doc = doc_with(json!({"claude-code": {"compatible": true}}));
        let issues = PlatformRuleRegistry::builtin().check_document(&doc, &RuleLimits::default());
        assert_eq!(kinds(&issues), vec![IssueKind::MissingFeature]);
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn windsurf_limit_boundary() {
        let at = doc_with(json!({"windsurf": {"compatible": true, "characterLimit": 6000}}));
        let over = doc_with(json!({"windsurf": {"compatible": true, "characterLimit": 6001}}));
        let registry = PlatformRuleRegistry::builtin();
        assert!(registry.check_document(&at, &RuleLimits::default()).is_empty());
        assert_eq!(
            kinds(&registry.check_document(&over, &RuleLimits::default())),
            vec![IssueKind::CharacterLimitExceeded]
        );
    }

    #[test]
    fn copilot_priority_range() {
        let registry = PlatformRuleRegistry::builtin();
        for (priority, expect_error) in [(0, true), (1, false), (10, false), (11, true), (-3, true)] {
            let doc = doc_with(json!({"github-copilot": {"compatible": true, "priority": priority}}));
            let issues = registry.check_document(&doc, &RuleLimits::default());
            assert_eq!(!issues.is_empty(), expect_error, "priority {priority}");
        }
    }

    #[test]
    fn copilot_priority_floats_are_range_checked() {
        let registry = PlatformRuleRegistry::builtin();
        for (priority, expect_error) in [(11.0, true), (0.5, true), (10.0, false), (1.0, false)] {
            let doc = doc_with(json!({"github-copilot": {"compatible": true, "priority": priority}}));
            let issues = registry.check_document(&doc, &RuleLimits::default());
            assert_eq!(!issues.is_empty(), expect_error, "priority {priority}");
            if expect_error {
                assert_eq!(issues[0].kind, IssueKind::InvalidPriority);
                assert_eq!(issues[0].severity, Severity::Error);
            }
        }
    }

    #[test]
    fn unknown_platform_has_no_rules() {
        let doc = doc_with(json!({"zed": {"compatible": true}}));
        assert!(PlatformRuleRegistry::builtin()
            .check_document(&doc, &RuleLimits::default())
            .is_empty());
    }

    #[test]
    fn custom_rule_can_be_registered() {
        fn always(_: &PlatformConfig, _: &ContextDocument, _: &RuleLimits) -> Vec<ValidationIssue> {
            vec![ValidationIssue::info(IssueKind::MissingFeature, "", "custom")]
        }
        let mut registry = PlatformRuleRegistry::empty();
        registry.register("zed", always);
        let doc = doc_with(json!({"zed": {"compatible": true}}));
        assert_eq!(registry.check_document(&doc, &RuleLimits::default()).len(), 1);
        assert_eq!(registry.platforms().collect::<Vec<_>>(), vec!["zed"]);
    }
}
