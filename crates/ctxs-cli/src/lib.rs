//! # ctxs-cli: Context Schema Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate`: structural, business-rule and relationship validation
//! - `compat`: cross-platform compatibility report
//!
//! ```bash
//! ctxs validate contexts/
//! ctxs validate contexts/rust-style.yaml --warnings
//! ctxs compat contexts/ --platform cursor --json
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to `ctxs-schema` and `ctxs-compat`; rendering lives
//!   in [`output`].
//! - Exit code 1 whenever an error-severity issue exists.

pub mod compat;
pub mod output;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use ctxs_core::ValidatorConfig;

/// Options shared by every reporting subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Document file or directory to check.
    pub path: PathBuf,

    /// Emit the full report as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Show per-document details even when everything passes.
    #[arg(long)]
    pub verbose: bool,

    /// Include warnings in the per-document details.
    #[arg(long)]
    pub warnings: bool,

    /// Restrict the report to one platform.
    #[arg(long, value_name = "NAME")]
    pub platform: Option<String>,

    /// JSON-Schema file to validate against instead of the embedded schema.
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,
}

/// Resolve configuration: `--config`, else `ctxs.yaml` in the working
/// directory, else defaults. `--schema` overrides the configured schema.
pub fn load_config(config: Option<&Path>, schema: Option<&Path>) -> Result<ValidatorConfig> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let mut resolved =
        ValidatorConfig::discover(config, &cwd).context("failed to load configuration")?;
    if let Some(schema) = schema {
        resolved.schema = Some(schema.to_path_buf());
    }
    tracing::debug!(schema = ?resolved.schema, "configuration resolved");
    Ok(resolved)
}

/// Map an "errors found" flag to a process exit code.
pub fn exit_code(has_errors: bool) -> u8 {
    u8::from(has_errors)
}
