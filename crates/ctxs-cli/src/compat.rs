//! # Compat Subcommand
//!
//! `ctxs compat PATH` reports how well the documents under a path serve
//! each assistant platform.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use ctxs_compat::CompatibilityChecker;

use crate::output::{write_compatibility, to_json, TextOptions};
use crate::{exit_code, load_config, ReportArgs};

/// Arguments for the compat subcommand.
#[derive(Args, Debug)]
pub struct CompatArgs {
    #[command(flatten)]
    pub report: ReportArgs,
}

/// Execute the compat subcommand.
pub fn run_compat(args: &CompatArgs, config: Option<&Path>) -> Result<u8> {
    let opts = &args.report;
    let config = load_config(config, opts.schema.as_deref())?;
    let checker = CompatibilityChecker::with_config(config)
        .context("failed to build compatibility checker")?
        .with_platform_filter(opts.platform.clone());

    let report = checker
        .check_compatibility(&opts.path)
        .with_context(|| format!("cannot check {}", opts.path.display()))?;

    if opts.json {
        println!("{}", to_json(&report)?);
    } else {
        write_compatibility(
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportArgs;

    fn args(path: &Path, platform: Option<&str>) -> CompatArgs {
        CompatArgs {
            report: ReportArgs {
                path: path.to_path_buf(),
                platform: platform.map(str::to_string),
                ..ReportArgs::default()
            },
        }
    }

    #[test]
    fn parse_failure_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.yaml"), "---\nid: [\n---\n").unwrap();
        let config = dir.path().join("ctxs.conf");
        std::fs::write(&config, "").unwrap();
        assert_eq!(run_compat(&args(dir.path(), None), Some(config.as_path())).unwrap(), 1);
    }

    #[test]
    fn empty_directory_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("ctxs.conf");
        std::fs::write(&config, "").unwrap();
        assert_eq!(
            run_compat(&args(dir.path(), Some("cursor")), Some(config.as_path())).unwrap(),
            0
        );
    }
}
