//! # Report Rendering
//!
//! Text reports print a summary first, then per-document details when
//! something failed or `--verbose` was given. JSON output is the report
//! serialized unmodified.

use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;

use ctxs_compat::CompatibilityReport;
use ctxs_core::ValidationIssue;
use ctxs_schema::{BatchReport, ValidationResult};

/// Detail options for text rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    /// Always print per-document details.
    pub verbose: bool,
    /// Include warnings in details.
    pub warnings: bool,
}

/// Pretty-printed JSON.
pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write a validation report as text.
pub fn write_validation(
    out: &mut impl Write,
    report: &BatchReport,
    opts: TextOptions,
) -> io::Result<()> {
    let s = &report.summary;
    writeln!(out, "=== Validation Results ===")?;
    writeln!(out, "Total:    {}", s.total)?;
    writeln!(out, "Valid:    {}", s.valid)?;
    writeln!(out, "Invalid:  {}", s.invalid)?;
    writeln!(out, "Errors:   {}", s.errors)?;
    writeln!(out, "Warnings: {}", s.warnings)?;

    if !s.error_types.is_empty() {
        writeln!(out, "\nError types:")?;
        for (kind, count) in &s.error_types {
            writeln!(out, "  {kind}: {count}")?;
        }
    }
    if opts.warnings && !s.warning_types.is_empty() {
        writeln!(out, "\nWarning types:")?;
        for (kind, count) in &s.warning_types {
            writeln!(out, "  {kind}: {count}")?;
        }
    }

    if s.invalid > 0 || opts.verbose {
        writeln!(out, "\nDetails:")?;
        for result in &report.results {
            write_result(out, result, opts)?;
        }
    }
    Ok(())
}

fn write_result(
    out: &mut impl Write,
    result: &ValidationResult,
    opts: TextOptions,
) -> io::Result<()> {
    let label = if result.valid { "PASS" } else { "FAIL" };
    writeln!(out, "  [{label}] {}", result.file_path)?;
    if !result.valid || opts.verbose {
        for issue in &result.errors {
            write_issue(out, "error", issue)?;
        }
    }
    if opts.warnings {
        for issue in &result.warnings {
            write_issue(out, issue.severity.as_str(), issue)?;
        }
    }
    Ok(())
}

fn write_issue(out: &mut impl Write, label: &str, issue: &ValidationIssue) -> io::Result<()> {
    writeln!(out, "      {label}: {issue}")
}

/// Write a compatibility report as text.
pub fn write_compatibility(
    out: &mut impl Write,
    report: &CompatibilityReport,
    opts: TextOptions,
) -> io::Result<()> {
    let s = &report.summary;
    writeln!(out, "=== Compatibility Results ===")?;
    writeln!(out, "Documents: {}", s.total_schemas)?;
    writeln!(out, "Excluded:  {}", s.errors.len())?;
    writeln!(
        out,
        "Tiers:     high {} / medium {} / low {}",
        s.tiers.high, s.tiers.medium, s.tiers.low
    )?;

    if !report.platforms.is_empty() {
        writeln!(out, "\nPlatforms:")?;
        for (name, platform) in &report.platforms {
            writeln!(
                out,
                "  {name:<16} {:>5.1}%  ({}/{} declaring, {} in corpus, {} issues)",
                platform.compatibility_rate,
                platform.compatible,
                platform.declared,
                platform.corpus_total,
                platform.issues.len()
            )?;
        }
    }

    if !s.issues_by_severity.is_empty() {
        writeln!(out, "\nIssues by severity:")?;
        for (severity, count) in &s.issues_by_severity {
            writeln!(out, "  {severity}: {count}")?;
        }
    }

    if !s.errors.is_empty() {
        writeln!(out, "\nExcluded documents:")?;
        for excluded in &s.errors {
            writeln!(
                out,
                "  [{}] {}: {}",
                excluded.kind, excluded.file_path, excluded.message
            )?;
            if opts.verbose {
                for issue in &excluded.errors {
                    write_issue(out, "error", issue)?;
                }
            }
        }
    }

    if opts.verbose || opts.warnings {
        writeln!(out, "\nDocuments:")?;
        for schema in &report.schemas {
            writeln!(
                out,
                "  {:<32} {:>3}  {:?}",
                schema.id, schema.score, schema.tier
            )?;
            if opts.warnings {
                for issue in schema.issues.iter().chain(&schema.cross_platform_issues) {
                    write_issue(out, issue.severity.as_str(), issue)?;
                }
            }
        }
    }
    Ok(())
}
