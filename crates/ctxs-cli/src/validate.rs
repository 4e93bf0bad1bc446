//! # Validate Subcommand
//!
//! `ctxs validate PATH` validates one document or every document under a
//! directory as a single batch.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use ctxs_schema::{BatchReport, SchemaValidator};

use crate::output::{write_validation, to_json, TextOptions};
use crate::{exit_code, load_config, ReportArgs};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub report: ReportArgs,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: Option<&Path>) -> Result<u8> {
    let opts = &args.report;
    let config = load_config(config, opts.schema.as_deref())?;
    let validator = SchemaValidator::with_config(config).context("failed to build validator")?;

    let mut report = validator
        .validate_path(&opts.path)
        .with_context(|| format!("cannot validate {}", opts.path.display()))?;
    if let Some(platform) = &opts.platform {
        report = restrict_to_platform(&report, platform);
    }

    if opts.json {
        println!("{}", to_json(&report)?);
    } else {
        write_validation(
            &mut std::io::stdout().lock(),
            &report,
            TextOptions {
                verbose: opts.verbose,
                warnings: opts.warnings,
            },
        )?;
    }
    Ok(exit_code(report.has_errors()))
}

/// Keep documents that declare `platform` and all parse failures.
fn restrict_to_platform(report: &BatchReport, platform: &str) -> BatchReport {
    BatchReport::new(report.for_platform(platform).cloned().collect())
}
