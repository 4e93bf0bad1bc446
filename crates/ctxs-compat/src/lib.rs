//! # ctxs-compat: Cross-Platform Compatibility
//!
//! Answers "which assistants can use this corpus, and how well?" for a set
//! of context documents.
//!
//! - [`CompatibilityChecker`] validates the corpus with
//!   [`ctxs_schema::SchemaValidator`], drops invalid documents into the
//!   summary, and analyzes the rest.
//! - Per platform: declared/compatible counts, a compatibility rate over
//!   declaring documents, rule issues from the shared
//!   [`ctxs_core::PlatformRuleRegistry`] at every severity, and a static
//!   feature description.
//! - Per document: a 0–100 score, a [`Tier`], rule issues and
//!   cross-platform issues (Windsurf truncation, Cursor activation
//!   conflicts).

pub mod checker;
pub mod report;
pub mod score;

pub use checker::{CompatError, CompatibilityChecker};
pub use report::{
    CompatibilityReport, CompatibilitySummary, ExcludedDocument, PlatformIssue, PlatformReport,
    PlatformSummary, SchemaCompatibility, TierCounts,
};
pub use score::{compatibility_score, cross_platform_issues, Tier};
