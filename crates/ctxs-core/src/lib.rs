#![deny(missing_docs)]

//! # ctxs-core: Foundational Types for Context Schema Validation
//!
//! Every other crate in the workspace depends on this one. It has no
//! internal crate dependencies and pulls only `serde`, `serde_json`,
//! `serde_yaml`, `thiserror` and `tracing` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Findings are data.** Per-document problems are [`ValidationIssue`]s,
//!    never errors that escape a batch. A batch of N documents always yields
//!    N results.
//!
//! 2. **Platforms are a sum type.** [`PlatformConfig`] has one variant per
//!    known platform with a typed payload and a `Generic` fallback, so
//!    platform dispatch is an exhaustive `match`.
//!
//! 3. **One rule table.** [`PlatformRuleRegistry`] is the single definition of
//!    per-platform field rules; schema validation and compatibility checking
//!    both consume it.
//!
//! 4. **Whole-batch graphs.** [`DependencyGraph`] is assembled from a full
//!    batch before cycle detection runs, so results never depend on
//!    document order.

pub mod config;
pub mod discover;
pub mod document;
pub mod error;
pub mod format;
pub mod graph;
pub mod issue;
pub mod platform;
pub mod rules;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{RuleLimits, ScoreTiers, ValidatorConfig, DEFAULT_CONFIG_FILE};
pub use discover::find_documents;
pub use document::{split_frontmatter, ContextDocument, CONTENT_FIELD};
pub use error::{ConfigError, DiscoveryError, DocumentError};
pub use format::{is_kebab_case_id, is_semantic_version};
pub use graph::{CycleReport, DependencyGraph};
pub use issue::{pointer, IssueKind, Severity, ValidationIssue};
pub use platform::{
    ClaudeCodeConfig, CursorActivation, CursorConfig, GenericConfig, GitHubCopilotConfig,
    PlatformConfig, PlatformFeatures, PlatformKind, WindsurfConfig,
};
pub use rules::{PlatformRule, PlatformRuleRegistry, COPILOT_PRIORITY_RANGE};
