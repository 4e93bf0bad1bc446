//! # Schema Validation
//!
//! Validates context documents in three layers:
//!
//! 1. **Structure**: the frontmatter against a draft-07 JSON Schema.
//! 2. **Business rules**: cycles, platform rules, formats, relationships
//!    within a single document (see [`crate::business`]).
//! 3. **Content heuristics**: warnings about the markdown body.
//!
//! Batch validation adds a fourth, cross-document pass
//! (see [`crate::relationships`]).
//!
//! ## Schema Resolution
//!
//! The schema is compiled once at construction. By default the schema
//! embedded in this crate is used. A schema loaded from disk may `$ref`
//! sibling `*.schema.json` files; these are resolved from the same
//! directory without network access.
//!
//! ## Batch Semantics
//!
//! A batch of N inputs always yields N results in input order. Parse and
//! read failures become `parse_error` results; they never abort the batch.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use serde_json::{json, Value};
use thiserror::Error;

use ctxs_core::{
    find_documents, pointer, ConfigError, ContextDocument, CycleReport, DependencyGraph,
    DiscoveryError, IssueKind, PlatformRuleRegistry, ValidationIssue, ValidatorConfig,
};

use crate::business::{business_issues, content_issues};
use crate::relationships::resolve_relationships;
use crate::report::{BatchReport, ValidationResult};

/// The context-document schema shipped with this crate.
pub const EMBEDDED_SCHEMA: &str = include_str!("../../../schemas/context.schema.json");

/// Label used for the embedded schema in logs and errors.
const EMBEDDED_SCHEMA_NAME: &str = "context.schema.json (embedded)";

/// Error constructing a validator or discovering its inputs.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema file could not be read or is not JSON.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoad {
        /// Schema file or label.
        schema_name: String,
        /// Why loading failed.
        reason: String,
    },

    /// The schema is not a valid draft-07 schema.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuild {
        /// Schema file or label.
        schema_name: String,
        /// Compiler message.
        reason: String,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The document root could not be walked.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Resolves `$ref` URIs against schemas loaded from disk.
struct LocalSchemaRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }
        Err(format!("schema '{uri_str}' is not available locally").into())
    }
}

/// Compiled schema plus the rule set applied after it.
pub struct SchemaValidator {
    schema_name: String,
    compiled: Validator,
    registry: PlatformRuleRegistry,
    config: ValidatorConfig,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema_name", &self.schema_name)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// A validator using the embedded schema and default configuration.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded schema itself is broken.
    pub fn new() -> Result<Self, SchemaError> {
        Self::with_config(ValidatorConfig::default())
    }

    /// A validator using `config`. If `config.schema` is set, that file is
    /// loaded instead of the embedded schema.
    pub fn with_config(config: ValidatorConfig) -> Result<Self, SchemaError> {
        match config.schema.clone() {
            Some(path) => {
                let (schema, siblings) = load_schema_file(&path)?;
                Self::build(path.display().to_string(), &schema, siblings, config)
            }
            None => {
                let schema: Value =
                    serde_json::from_str(EMBEDDED_SCHEMA).map_err(|e| SchemaError::SchemaLoad {
                        schema_name: EMBEDDED_SCHEMA_NAME.to_string(),
                        reason: format!("invalid JSON: {e}"),
                    })?;
                Self::build(EMBEDDED_SCHEMA_NAME.to_string(), &schema, HashMap::new(), config)
            }
        }
    }

    /// A validator for a schema file on disk with default configuration.
    pub fn from_schema_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        Self::with_config(ValidatorConfig {
            schema: Some(path.as_ref().to_path_buf()),
            ..ValidatorConfig::default()
        })
    }

    /// A validator for an in-memory schema.
    pub fn from_schema_value(
        schema: &Value,
        config: ValidatorConfig,
    ) -> Result<Self, SchemaError> {
        Self::build("<inline>".to_string(), schema, HashMap::new(), config)
    }

    /// Replace the platform rule table.
    pub fn with_registry(mut self, registry: PlatformRuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    fn build(
        schema_name: String,
        schema: &Value,
        schemas_by_uri: HashMap<String, Value>,
        config: ValidatorConfig,
    ) -> Result<Self, SchemaError> {
        let opts = build_options(schemas_by_uri);
        let compiled = opts.build(schema).map_err(|e| SchemaError::ValidatorBuild {
            schema_name: schema_name.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(schema = %schema_name, "compiled context schema");
        Ok(Self {
            schema_name,
            compiled,
            registry: PlatformRuleRegistry::builtin(),
            config,
        })
    }

    /// The schema file or label this validator was built from.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The active platform rule table.
    pub fn registry(&self) -> &PlatformRuleRegistry {
        &self.registry
    }

    /// Structural violations of `instance` against the compiled schema.
    pub fn structural_issues(&self, instance: &Value) -> Vec<ValidationIssue> {
        self.compiled
            .iter_errors(instance)
            .map(|e| {
                let mut path = e.instance_path.to_string();
                if let ValidationErrorKind::Required { property } = &e.kind {
                    if let Some(name) = property.as_str() {
                        path.push_str(&pointer(&[name]));
                    }
                }
                ValidationIssue::error(IssueKind::SchemaValidation, path, e.to_string())
                    .with_data(json!({ "schemaPath": e.schema_path.to_string() }))
            })
            .collect()
    }

    /// Validate one document on its own.
    ///
    /// Cycle detection sees only this document, so only self-requirements
    /// are reported. Use [`SchemaValidator::validate_files`] for batch-wide
    /// cycles and relationship checks.
    pub fn validate_document(&self, doc: ContextDocument, label: &str) -> ValidationResult {
        let cycles = DependencyGraph::from_documents([&doc]).cycles();
        self.validate_with_cycles(doc, label, &cycles)
    }

    /// Parse and validate source text.
    pub fn validate_source(&self, source: &str, label: &str) -> ValidationResult {
        match ContextDocument::parse(source) {
            Ok(doc) => self.validate_document(doc, label),
            Err(e) => {
                tracing::debug!(file = %label, error = %e, "document failed to parse");
                ValidationResult::parse_failure(label, &e)
            }
        }
    }

    /// Read, parse and validate one file.
    pub fn validate_file(&self, path: &Path) -> ValidationResult {
        let label = path.display().to_string();
        match ContextDocument::from_file(path) {
            Ok(doc) => self.validate_document(doc, &label),
            Err(e) => {
                tracing::debug!(file = %label, error = %e, "document failed to load");
                ValidationResult::parse_failure(label, &e)
            }
        }
    }

    /// Validate a batch of files with batch-wide cycle detection, duplicate
    /// ID detection and relationship resolution.
    pub fn validate_files<P: AsRef<Path>>(&self, paths: &[P]) -> BatchReport {
        let parsed: Vec<(String, Result<ContextDocument, ctxs_core::DocumentError>)> = paths
            .iter()
            .map(|p| {
                let path = p.as_ref();
                (path.display().to_string(), ContextDocument::from_file(path))
            })
            .collect();

        let cycles = DependencyGraph::from_documents(
            parsed.iter().filter_map(|(_, doc)| doc.as_ref().ok()),
        )
        .cycles();
        if cycles.has_cycles() {
            tracing::debug!(count = cycles.cycles().len(), "dependency cycles detected");
        }

        let mut results: Vec<ValidationResult> = parsed
            .into_iter()
            .map(|(label, doc)| match doc {
                Ok(doc) => self.validate_with_cycles(doc, &label, &cycles),
                Err(e) => {
                    tracing::debug!(file = %label, error = %e, "document failed to load");
                    ValidationResult::parse_failure(label, &e)
                }
            })
            .collect();

        resolve_relationships(&mut results);

        let report = BatchReport::new(results);
        tracing::info!(
            total = report.summary.total,
            valid = report.summary.valid,
            invalid = report.summary.invalid,
            "validated context documents"
        );
        report
    }

    /// Discover documents under `root` and validate them as one batch.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Discovery`] if `root` does not exist or cannot be listed.
    pub fn validate_path(&self, root: &Path) -> Result<BatchReport, SchemaError> {
        let paths: Vec<PathBuf> = find_documents(root, &self.config)?;
        Ok(self.validate_files(&paths))
    }

    fn validate_with_cycles(
        &self,
        doc: ContextDocument,
        label: &str,
        cycles: &CycleReport,
    ) -> ValidationResult {
        let limits = &self.config.limits;
        let mut issues = self.structural_issues(&doc.frontmatter_value());
        issues.extend(business_issues(&doc, cycles, &self.registry, limits));
        issues.extend(content_issues(&doc, limits));
        ValidationResult::from_issues(label, doc, issues)
    }
}

fn build_options(schemas_by_uri: HashMap<String, Value>) -> ValidationOptions {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);
    opts.with_retriever(LocalSchemaRetriever { schemas_by_uri });
    opts
}

/// Load a schema file plus every `*.schema.json` beside it, indexed by
/// filename and by `$id`.
fn load_schema_file(path: &Path) -> Result<(Value, HashMap<String, Value>), SchemaError> {
    let schema = read_json(path)?;
    let mut schemas_by_uri = HashMap::new();
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let sibling = entry.path();
                let Some(name) = sibling.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if !name.ends_with(".schema.json") {
                    continue;
                }
                match read_json(&sibling) {
                    Ok(value) => {
                        if let Some(id) = value.get("$id").and_then(Value::as_str) {
                            schemas_by_uri.insert(id.to_string(), value.clone());
                        }
                        schemas_by_uri.insert(name.to_string(), value);
                    }
                    Err(e) => {
                        tracing::warn!(schema = %sibling.display(), error = %e, "skipping unreadable sibling schema");
                    }
                }
            }
        }
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list schema directory");
        }
    }
    Ok((schema, schemas_by_uri))
}

fn read_json(path: &Path) -> Result<Value, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::SchemaLoad {
        schema_name: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;
    serde_json::from_str(&content).map_err(|e| SchemaError::SchemaLoad {
        schema_name: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}
