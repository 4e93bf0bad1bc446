//! # ctxs CLI entry point
//!
//! Parses command-line arguments, initializes logging, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ctxs_cli::compat::{run_compat, CompatArgs};
use ctxs_cli::validate::{run_validate, ValidateArgs};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "CTXS_LOG";

/// Environment variable selecting the log format (`json` or text).
const LOG_FORMAT_ENV: &str = "CTXS_LOG_FORMAT";

/// Context schema toolchain.
///
/// Validates AI-assistant context documents (YAML frontmatter plus
/// markdown) and reports their cross-platform compatibility.
#[derive(Parser, Debug)]
#[command(name = "ctxs", version, about, long_about = None)]
struct Cli {
    /// Path to a configuration file (default: ./ctxs.yaml if present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against the schema and business rules.
    Validate(ValidateArgs),

    /// Report cross-platform compatibility of valid documents.
    Compat(CompatArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args, config),
        Commands::Compat(args) => run_compat(args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
