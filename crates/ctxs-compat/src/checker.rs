//! # Compatibility Checker
//!
//! Validates a corpus through [`SchemaValidator`], then analyzes the valid
//! documents platform by platform and document by document. Invalid
//! documents are listed in the summary and take no further part.
//!
//! An optional platform filter restricts the analysis to documents that
//! declare that platform, and restricts platform reports and issues to it.
//! Document scores always cover every declared platform.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use thiserror::Error;

use ctxs_core::{
    find_documents, ContextDocument, DiscoveryError, IssueKind, PlatformFeatures, PlatformKind,
    PlatformRuleRegistry, ValidatorConfig,
};
use ctxs_schema::{BatchReport, SchemaError, SchemaValidator, ValidationResult};

use crate::report::{
    percentage, CompatibilityReport, CompatibilitySummary, ExcludedDocument, PlatformIssue,
    PlatformReport, PlatformSummary, SchemaCompatibility,
};
use crate::score::{compatibility_score, cross_platform_issues, issue_platform, Tier};

/// Error that aborts a compatibility run.
#[derive(Error, Debug)]
pub enum CompatError {
    /// The validator could not be built.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The document root could not be walked.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Computes compatibility reports over a corpus.
#[derive(Debug)]
pub struct CompatibilityChecker {
    validator: SchemaValidator,
    platform_filter: Option<String>,
}

impl CompatibilityChecker {
    /// A checker with the embedded schema and default configuration.
    pub fn new() -> Result<Self, CompatError> {
        Ok(Self::with_validator(SchemaValidator::new()?))
    }

    /// A checker built from `config`.
    pub fn with_config(config: ValidatorConfig) -> Result<Self, CompatError> {
        Ok(Self::with_validator(SchemaValidator::with_config(config)?))
    }

    /// A checker reusing an existing validator, its configuration and its
    /// rule table.
    pub fn with_validator(validator: SchemaValidator) -> Self {
        Self {
            validator,
            platform_filter: None,
        }
    }

    /// Restrict the analysis to one platform.
    pub fn with_platform_filter(mut self, platform: Option<String>) -> Self {
        self.platform_filter = platform;
        self
    }

    /// The underlying validator.
    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    fn registry(&self) -> &PlatformRuleRegistry {
        self.validator.registry()
    }

    fn config(&self) -> &ValidatorConfig {
        self.validator.config()
    }

    /// Discover documents under `root` and analyze them.
    ///
    /// # Errors
    ///
    /// [`CompatError::Discovery`] if `root` does not exist or cannot be listed.
    pub fn check_compatibility(&self, root: &Path) -> Result<CompatibilityReport, CompatError> {
        let paths = find_documents(root, self.config())?;
        Ok(self.check_paths(&paths))
    }

    /// Validate and analyze specific files.
    pub fn check_paths<P: AsRef<Path>>(&self, paths: &[P]) -> CompatibilityReport {
        let batch = self.validator.validate_files(paths);
        self.check_batch(&batch)
    }

    /// Analyze an already-validated batch.
    pub fn check_batch(&self, batch: &BatchReport) -> CompatibilityReport {
        let mut summary = CompatibilitySummary::default();
        let mut valid: Vec<(&str, &ContextDocument)> = Vec::new();

        for result in &batch.results {
            match (&result.schema, result.valid) {
                (Some(doc), true) => valid.push((result.file_path.as_str(), doc)),
                _ => summary.errors.push(excluded(result)),
            }
        }

        if let Some(filter) = &self.platform_filter {
            valid.retain(|(_, doc)| doc.platforms.contains_key(filter));
        }

        let platform_names: BTreeSet<&str> = valid
            .iter()
            .flat_map(|(_, doc)| doc.platforms.keys().map(String::as_str))
            .filter(|name| self.in_scope(name))
            .collect();

        let corpus_total = valid.len();
        let mut platforms = BTreeMap::new();
        for name in platform_names {
            let report = self.platform_report(name, &valid, corpus_total);
            summary.platforms.insert(
                name.to_string(),
                PlatformSummary {
                    compatibility_rate: report.compatibility_rate,
                    issues: report.issues.len(),
                },
            );
            platforms.insert(name.to_string(), report);
        }

        let schemas: Vec<SchemaCompatibility> = valid
            .iter()
            .map(|(file_path, doc)| self.schema_compatibility(file_path, doc))
            .collect();
        summary.total_schemas = schemas.len();
        for schema in &schemas {
            summary.record_schema(schema);
        }

        tracing::info!(
            documents = summary.total_schemas,
            platforms = platforms.len(),
            excluded = summary.errors.len(),
            "computed compatibility report"
        );

        CompatibilityReport {
            platforms,
            schemas,
            summary,
        }
    }

    fn in_scope(&self, platform: &str) -> bool {
        self.platform_filter
            .as_deref()
            .map_or(true, |filter| filter == platform)
    }

    fn platform_report(
        &self,
        name: &str,
        docs: &[(&str, &ContextDocument)],
        corpus_total: usize,
    ) -> PlatformReport {
        let limits = &self.config().limits;
        let mut declared = 0;
        let mut compatible = 0;
        let mut issues = Vec::new();

        for (file_path, doc) in docs {
            let Some(config) = doc.platforms.get(name) else {
                continue;
            };
            declared += 1;
            if config.is_compatible() {
                compatible += 1;
            }
            issues.extend(
                self.registry()
                    .check_platform(name, config, doc, limits)
                    .into_iter()
                    .map(|issue| PlatformIssue {
                        schema_id: doc.id.clone(),
                        file_path: file_path.to_string(),
                        issue,
                    }),
            );
        }

        tracing::debug!(platform = name, declared, compatible, "platform analyzed");

        PlatformReport {
            declared,
            compatible,
            incompatible: declared - compatible,
            corpus_total,
            compatibility_rate: percentage(compatible, declared),
            issues,
            features: PlatformFeatures::for_platform(&PlatformKind::from_name(name)),
        }
    }

    fn schema_compatibility(&self, file_path: &str, doc: &ContextDocument) -> SchemaCompatibility {
        let limits = &self.config().limits;
        let score = compatibility_score(doc);
        let issues = doc
            .platforms
            .iter()
            .filter(|(name, _)| self.in_scope(name))
            .flat_map(|(name, config)| self.registry().check_platform(name, config, doc, limits))
            .collect();
        let cross_platform_issues = cross_platform_issues(doc, limits)
            .into_iter()
            .filter(|issue| issue_platform(issue).map_or(true, |p| self.in_scope(p)))
            .collect();

        SchemaCompatibility {
            id: doc.id.clone(),
            file_path: file_path.to_string(),
            score,
            tier: Tier::from_score(score, &self.config().tiers),
            platforms: doc
                .platforms
                .iter()
                .map(|(name, config)| (name.clone(), config.is_compatible()))
                .collect(),
            issues,
            cross_platform_issues,
        }
    }
}

fn excluded(result: &ValidationResult) -> ExcludedDocument {
    if result.is_parse_failure() {
        let message = result
            .errors
            .first()
            .map(|issue| issue.message.clone())
            .unwrap_or_default();
        ExcludedDocument {
            file_path: result.file_path.clone(),
            kind: IssueKind::ParseError,
            message,
            errors: result.errors.clone(),
        }
    } else {
        ExcludedDocument {
            file_path: result.file_path.clone(),
            kind: IssueKind::InvalidSchema,
            message: format!("Document failed validation with {} error(s)", result.errors.len()),
            errors: result.errors.clone(),
        }
    }
}
