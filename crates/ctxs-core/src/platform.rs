//! # Platform Configurations
//!
//! The `platforms` mapping of a context document has a per-key shape: the
//! platform name decides which fields are meaningful. [`PlatformConfig`] is a
//! sum type over the known platform kinds, each with its own typed payload,
//! plus a [`PlatformConfig::Generic`] variant for platform names this crate
//! does not know about.
//!
//! Typed fields are extracted leniently: a wrong-typed value (e.g.
//! `priority: "high"` on github-copilot) becomes `None` here and is reported
//! by structural JSON-Schema validation instead. This keeps a single source
//! of truth for type errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Platform names with dedicated configuration shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlatformKind {
    /// `claude-code`
    ClaudeCode,
    /// `cursor`
    Cursor,
    /// `windsurf`
    Windsurf,
    /// `github-copilot`
    GitHubCopilot,
    /// Any other platform name.
    Other(String),
}

impl PlatformKind {
    /// Map a platform key to its kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "claude-code" => Self::ClaudeCode,
            "cursor" => Self::Cursor,
            "windsurf" => Self::Windsurf,
            "github-copilot" => Self::GitHubCopilot,
            other => Self::Other(other.to_string()),
        }
    }

    /// The platform key as written in documents.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClaudeCode => "claude-code",
            Self::Cursor => "cursor",
            Self::Windsurf => "windsurf",
            Self::GitHubCopilot => "github-copilot",
            Self::Other(name) => name,
        }
    }

    /// Whether this is one of the platforms with a dedicated shape.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a Cursor rule is attached to a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorActivation {
    /// Attached when an open file matches `globs`.
    AutoAttached,
    /// The agent decides from the description.
    AgentRequested,
    /// Only when referenced explicitly.
    Manual,
    /// Always attached.
    Always,
}

impl CursorActivation {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "auto-attached" => Some(Self::AutoAttached),
            "agent-requested" => Some(Self::AgentRequested),
            "manual" => Some(Self::Manual),
            "always" => Some(Self::Always),
            _ => None,
        }
    }

    /// Label as written in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoAttached => "auto-attached",
            Self::AgentRequested => "agent-requested",
            Self::Manual => "manual",
            Self::Always => "always",
        }
    }
}

/// `claude-code` configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaudeCodeConfig {
    /// Whether the document targets this platform.
    pub compatible: bool,
    /// Include in the persistent memory file.
    pub memory: Option<bool>,
    /// Expose as a slash command.
    pub command: Option<bool>,
    /// Slash command namespace.
    pub namespace: Option<String>,
    /// Tool allow-list.
    pub allowed_tools: Vec<String>,
    /// MCP server integration.
    pub mcp_integration: Option<bool>,
}

/// `cursor` configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorConfig {
    /// Whether the document targets this platform.
    pub compatible: bool,
    /// Rule activation mode.
    pub activation: Option<CursorActivation>,
    /// File globs for `auto-attached` activation. `None` when absent.
    pub globs: Option<Vec<String>>,
    /// `high`, `medium` or `low`.
    pub priority: Option<String>,
}

/// `windsurf` configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindsurfConfig {
    /// Whether the document targets this platform.
    pub compatible: bool,
    /// `global` or `workspace`.
    pub mode: Option<String>,
    /// XML tag wrapping the rule.
    pub xml_tag: Option<String>,
    /// Declared character budget.
    pub character_limit: Option<f64>,
}

/// `github-copilot` configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitHubCopilotConfig {
    /// Whether the document targets this platform.
    pub compatible: bool,
    /// Priority, expected within 1..=10. Read as a number of any kind so
    /// negatives and floats such as `11.0` survive extraction and can be
    /// reported.
    pub priority: Option<f64>,
    /// `security`, `performance`, `code-quality`, `style` or `general`.
    pub review_type: Option<String>,
    /// `repository` or `organization`.
    pub scope: Option<String>,
}

/// Configuration for a platform without a dedicated shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericConfig {
    /// Platform key.
    pub name: String,
    /// Whether the document targets this platform.
    pub compatible: bool,
    /// Every other field, untouched.
    pub fields: Map<String, Value>,
}

/// One entry of a document's `platforms` mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformConfig {
    /// `claude-code`
    ClaudeCode(ClaudeCodeConfig),
    /// `cursor`
    Cursor(CursorConfig),
    /// `windsurf`
    Windsurf(WindsurfConfig),
    /// `github-copilot`
    GitHubCopilot(GitHubCopilotConfig),
    /// Anything else.
    Generic(GenericConfig),
}

impl PlatformConfig {
    /// Build a typed configuration from the raw value under `platforms.<name>`.
    ///
    /// Non-object values produce an incompatible configuration with no fields.
    pub fn from_value(name: &str, value: &Value) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);
        // Only a literal `true` counts; the reference treats anything else as falsy.
        let compatible = obj.get("compatible").and_then(Value::as_bool).unwrap_or(false);

        match PlatformKind::from_name(name) {
            PlatformKind::ClaudeCode => Self::ClaudeCode(ClaudeCodeConfig {
                compatible,
                memory: get_bool(obj, "memory"),
                command: get_bool(obj, "command"),
                namespace: get_str(obj, "namespace"),
                allowed_tools: get_str_list(obj, "allowedTools").unwrap_or_default(),
                mcp_integration: get_bool(obj, "mcpIntegration"),
            }),
            PlatformKind::Cursor => Self::Cursor(CursorConfig {
                compatible,
                activation: obj
                    .get("activation")
                    .and_then(Value::as_str)
                    .and_then(CursorActivation::parse),
                globs: get_str_list(obj, "globs"),
                priority: get_str(obj, "priority"),
            }),
            PlatformKind::Windsurf => Self::Windsurf(WindsurfConfig {
                compatible,
                mode: get_str(obj, "mode"),
                xml_tag: get_str(obj, "xmlTag"),
                character_limit: obj.get("characterLimit").and_then(Value::as_f64),
            }),
            PlatformKind::GitHubCopilot => Self::GitHubCopilot(GitHubCopilotConfig {
                compatible,
                priority: obj.get("priority").and_then(Value::as_f64),
                review_type: get_str(obj, "reviewType"),
                scope: get_str(obj, "scope"),
            }),
            PlatformKind::Other(name) => {
                let mut fields = obj.clone();
                fields.remove("compatible");
                Self::Generic(GenericConfig {
                    name,
                    compatible,
                    fields,
                })
            }
        }
    }

    /// The platform kind of this entry.
    pub fn kind(&self) -> PlatformKind {
        match self {
            Self::ClaudeCode(_) => PlatformKind::ClaudeCode,
            Self::Cursor(_) => PlatformKind::Cursor,
            Self::Windsurf(_) => PlatformKind::Windsurf,
            Self::GitHubCopilot(_) => PlatformKind::GitHubCopilot,
            Self::Generic(g) => PlatformKind::Other(g.name.clone()),
        }
    }

    /// Whether the document declares `compatible: true` for this platform.
    pub fn is_compatible(&self) -> bool {
        match self {
            Self::ClaudeCode(c) => c.compatible,
            Self::Cursor(c) => c.compatible,
            Self::Windsurf(c) => c.compatible,
            Self::GitHubCopilot(c) => c.compatible,
            Self::Generic(c) => c.compatible,
        }
    }
}

fn get_bool(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

fn get_str(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// A list of strings; non-string items are dropped. `None` when the key is
/// absent or not an array.
fn get_str_list(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    obj.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Static feature table
// ---------------------------------------------------------------------------

/// Supported features and known limitations of a platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFeatures {
    /// Capabilities a context document can rely on.
    pub supported: Vec<String>,
    /// Constraints a context document must respect.
    pub limitations: Vec<String>,
}

impl PlatformFeatures {
    /// Feature description for a platform. Unknown platforms get empty lists.
    pub fn for_platform(kind: &PlatformKind) -> Self {
        let (supported, limitations): (&[&str], &[&str]) = match kind {
            PlatformKind::ClaudeCode => (
                &[
                    "memory files",
                    "slash commands",
                    "command namespaces",
                    "tool allow-lists",
                    "MCP integration",
                ],
                &["memory is loaded for every session"],
            ),
            PlatformKind::Cursor => (
                &[
                    "glob-based auto attachment",
                    "agent-requested rules",
                    "manual rules",
                    "always-on rules",
                    "rule priority",
                ],
                &["auto-attached rules require globs"],
            ),
            PlatformKind::Windsurf => (
                &["global and workspace rules", "XML tag wrapping"],
                &["6000 character limit per rule"],
            ),
            PlatformKind::GitHubCopilot => (
                &[
                    "repository instructions",
                    "organization instructions",
                    "review focus types",
                ],
                &["priority must be between 1 and 10"],
            ),
            PlatformKind::Other(_) => (&[], &[]),
        };
        Self {
            supported: supported.iter().map(|s| s.to_string()).collect(),
            limitations: limitations.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_round_trips_names() {
        for name in ["claude-code", "cursor", "windsurf", "github-copilot", "zed"] {
            assert_eq!(PlatformKind::from_name(name).as_str(), name);
        }
        assert!(PlatformKind::from_name("cursor").is_known());
        assert!(!PlatformKind::from_name("zed").is_known());
    }

    #[test]
    fn claude_code_fields_extracted() {
        let cfg = PlatformConfig::from_value(
            "claude-code",
            &json!({
                "compatible": true,
                "memory": true,
                "command": true,
                "namespace": "project",
                "allowedTools": ["Read", "Edit"],
                "mcpIntegration": false
            }),
        );
        let PlatformConfig::ClaudeCode(c) = cfg else {
            panic!("expected claude-code variant");
        };
        assert!(c.compatible);
        assert_eq!(c.memory, Some(true));
        assert_eq!(c.command, Some(true));
        assert_eq!(c.namespace.as_deref(), Some("project"));
        assert_eq!(c.allowed_tools, vec!["Read", "Edit"]);
        assert_eq!(c.mcp_integration, Some(false));
    }

    #[test]
    fn cursor_absent_globs_is_none_and_empty_is_some() {
        let absent = PlatformConfig::from_value(
            "cursor",
            &json!({"compatible": true, "activation": "auto-attached"}),
        );
        let PlatformConfig::Cursor(c) = absent else {
            panic!("expected cursor variant");
        };
        assert_eq!(c.activation, Some(CursorActivation::AutoAttached));
        assert!(c.globs.is_none());

        let empty = PlatformConfig::from_value("cursor", &json!({"compatible": true, "globs": []}));
        let PlatformConfig::Cursor(c) = empty else {
            panic!("expected cursor variant");
        };
        assert_eq!(c.globs, Some(vec![]));
    }

    #[test]
    fn wrong_types_become_absent() {
        let cfg = PlatformConfig::from_value(
            "github-copilot",
            &json!({"compatible": true, "priority": "high"}),
        );
        let PlatformConfig::GitHubCopilot(c) = cfg else {
            panic!("expected copilot variant");
        };
        assert!(c.priority.is_none());
    }

    #[test]
    fn compatible_must_be_literal_true() {
        let cfg = PlatformConfig::from_value("windsurf", &json!({"compatible": "yes"}));
        assert!(!cfg.is_compatible());
        let cfg = PlatformConfig::from_value("windsurf", &json!(null));
        assert!(!cfg.is_compatible());
    }

    #[test]
    fn unknown_platform_is_generic_and_keeps_fields() {
        let cfg = PlatformConfig::from_value("zed", &json!({"compatible": true, "theme": "dark"}));
        assert_eq!(cfg.kind(), PlatformKind::Other("zed".to_string()));
        let PlatformConfig::Generic(g) = cfg else {
            panic!("expected generic variant");
        };
        assert!(g.compatible);
        assert_eq!(g.fields.get("theme"), Some(&json!("dark")));
        assert!(g.fields.get("compatible").is_none());
    }

    #[test]
    fn feature_table_covers_known_platforms_only() {
        for name in ["claude-code", "cursor", "windsurf", "github-copilot"] {
            let features = PlatformFeatures::for_platform(&PlatformKind::from_name(name));
            assert!(!features.supported.is_empty(), "{name} has no features");
        }
        let unknown = PlatformFeatures::for_platform(&PlatformKind::from_name("zed"));
        assert!(unknown.supported.is_empty());
        assert!(unknown.limitations.is_empty());
    }
}
