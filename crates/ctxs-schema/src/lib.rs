//! # ctxs-schema: Context Document Validation
//!
//! Validates context documents (YAML frontmatter plus markdown body) for
//! structural, semantic and content quality.
//!
//! ## Layers
//!
//! - [`validate`]: [`SchemaValidator`] compiles the draft-07 schema once and
//!   drives the per-document and batch pipelines.
//! - [`business`]: cycles, platform rules, formats, `requires`/`conflicts`
//!   overlap, content heuristics.
//! - [`relationships`]: batch-wide duplicate IDs and unresolved references.
//! - [`report`]: [`ValidationResult`], [`ValidationSummary`], [`BatchReport`].
//!
//! ## Crate Policy
//!
//! - Depends only on `ctxs-core` internally.
//! - Per-document findings are data. Only schema loading and root
//!   discovery return `Err`.

pub mod business;
pub mod relationships;
pub mod report;
pub mod validate;

pub use report::{BatchReport, ValidationResult, ValidationSummary};
pub use validate::{SchemaError, SchemaValidator, EMBEDDED_SCHEMA};
