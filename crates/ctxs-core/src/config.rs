//! # Validator Configuration
//!
//! Optional YAML configuration (`ctxs.yaml`). Every field has a default, so
//! an empty file and no file at all behave identically.
//!
//! ```yaml
//! schema: schemas/context.schema.json
//! extensions: [yaml, yml]
//! limits:
//!   min_content_length: 50
//!   windsurf_character_limit: 6000
//! tiers:
//!   high: 80
//!   medium: 50
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default configuration file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ctxs.yaml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// JSON-Schema file; the embedded schema is used when `None`.
    pub schema: Option<PathBuf>,
    /// File extensions treated as context documents during discovery.
    pub extensions: Vec<String>,
    /// Thresholds used by business rules and content heuristics.
    pub limits: RuleLimits,
    /// Compatibility score tier boundaries.
    pub tiers: ScoreTiers,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            schema: None,
            extensions: vec!["yaml".to_string(), "yml".to_string()],
            limits: RuleLimits::default(),
            tiers: ScoreTiers::default(),
        }
    }
}

/// Numeric thresholds for rules and heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleLimits {
    /// Bodies shorter than this many characters are "too short".
    pub min_content_length: usize,
    /// Windsurf per-rule character budget.
    pub windsurf_character_limit: usize,
    /// Fixed overhead added to the size estimate.
    pub size_overhead: usize,
    /// Minimum expected description length.
    pub description_min: usize,
    /// Maximum expected description length.
    pub description_max: usize,
}

impl Default for RuleLimits {
    fn default() -> Self {
        Self {
            min_content_length: 50,
            windsurf_character_limit: 6000,
            size_overhead: 200,
            description_min: 10,
            description_max: 500,
        }
    }
}

/// Score boundaries: `score >= high` is high, `score >= medium` is medium,
/// everything else is low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreTiers {
    /// Lower bound of the high tier.
    pub high: u8,
    /// Lower bound of the medium tier.
    pub medium: u8,
}

impl Default for ScoreTiers {
    fn default() -> Self {
        Self { high: 80, medium: 50 }
    }
}

impl ValidatorConfig {
    /// Parse configuration from YAML text.
    ///
    /// `path` is only used for error messages.
    pub fn from_yaml_str(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Invalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        };
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// A relative `schema` path is resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&text, path)?;
        if let (Some(schema), Some(base)) = (config.schema.as_ref(), path.parent()) {
            if schema.is_relative() {
                config.schema = Some(base.join(schema));
            }
        }
        tracing::debug!(config = %path.display(), "loaded validator configuration");
        Ok(config)
    }

    /// Load `path` if given, else `ctxs.yaml` in `dir` if present, else defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    Self::from_file(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Whether `path` has one of the configured document extensions.
    pub fn is_document_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.tiers.high > 100 {
            return Err(ConfigError::OutOfRange {
                field: "tiers.high",
                reason: format!("{} exceeds 100", self.tiers.high),
            });
        }
        if self.tiers.medium > self.tiers.high {
            return Err(ConfigError::OutOfRange {
                field: "tiers.medium",
                reason: format!(
                    "{} exceeds tiers.high ({})",
                    self.tiers.medium, self.tiers.high
                ),
            });
        }
        if self.limits.description_min > self.limits.description_max {
            return Err(ConfigError::OutOfRange {
                field: "limits.description_min",
                reason: format!(
                    "{} exceeds limits.description_max ({})",
                    self.limits.description_min, self.limits.description_max
                ),
            });
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::OutOfRange {
                field: "extensions",
                reason: "at least one extension is required".to_string(),
            });
        }
        Ok(())
    }
}
